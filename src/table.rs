//! Monthly hours table.
//!
//! Projects sparse `(date, person) -> hours` records onto a dense grid: one
//! row per calendar day, one column per roster actor.
//!
//! # Algorithm
//!
//! 1. Read the roster (column order) and the month's hour records.
//! 2. Group records by date, then by person.
//! 3. Walk every day of the month in order, summing each row and
//!    accumulating column totals and the grand total.
//! 4. Render numbers with [`format_cell`] / [`format_total`].
//!
//! Records for people outside the roster have no column and are left out
//! of every total, so the grand total always equals the sum of the column
//! totals.
//!
//! # Display
//!
//! | Value | Cell / row total | Column / grand total |
//! |-------|------------------|----------------------|
//! | absent or zero | `""` | `"0"` |
//! | `8.0` | `"8"` | `"8"` |
//! | `4.50` | `"4.5"` | `"4.5"` |

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::models::{CalendarDate, HourRecord, MonthSpan, WeekdayLabels};
use crate::roster::RosterProvider;
use crate::store::{HoursLedger, KeyedStore};

/// One day of the monthly table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub date: CalendarDate,
    pub day_of_week: String,
    /// Rendered hours per roster actor.
    pub actor_hours: BTreeMap<String, String>,
    pub row_total: String,
    /// Shared remark for the date, empty if none.
    pub remarks: String,
}

/// Dense actor-by-day hours table for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleTable {
    pub year: i32,
    pub month: u32,
    /// Column order.
    pub actor_names: Vec<String>,
    pub rows: Vec<RowView>,
    pub column_totals: BTreeMap<String, String>,
    pub grand_total: String,
}

/// Builds [`ScheduleTable`]s from the hours ledger and roster.
pub struct TableBuilder {
    hours: Arc<dyn HoursLedger>,
    roster: Arc<dyn RosterProvider>,
    labels: WeekdayLabels,
}

impl TableBuilder {
    pub fn new(hours: Arc<dyn HoursLedger>, roster: Arc<dyn RosterProvider>) -> Self {
        Self {
            hours,
            roster,
            labels: WeekdayLabels::default(),
        }
    }

    pub fn with_labels(mut self, labels: WeekdayLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Builds the table for `year`-`month`; fails on an invalid month.
    pub fn build_table(&self, year: i32, month: u32) -> Result<ScheduleTable> {
        let span = MonthSpan::new(year, month)?;
        self.build(span)
    }

    pub fn build(&self, span: MonthSpan) -> Result<ScheduleTable> {
        let actors = self.roster.active_actors()?;
        let records = self
            .hours
            .find_by_date_range(span.first_day(), span.last_day())?;
        debug!(month = %span, actors = actors.len(), records = records.len(), "building table");
        Ok(project(span, &actors, &records, self.labels))
    }
}

/// Per-date view of the month's records.
#[derive(Default)]
struct DayRecords<'a> {
    hours: HashMap<&'a str, Decimal>,
    remarks: Option<&'a str>,
}

/// Pure projection of hour records onto the month grid.
pub fn project(
    span: MonthSpan,
    actors: &[String],
    records: &[HourRecord],
    labels: WeekdayLabels,
) -> ScheduleTable {
    let mut by_date: HashMap<CalendarDate, DayRecords<'_>> = HashMap::new();
    for record in records.iter().filter(|r| span.contains(r.date)) {
        let day = by_date.entry(record.date).or_default();
        *day.hours.entry(record.person_name.as_str()).or_default() += record.hours;
        if day.remarks.is_none() && !record.remarks.trim().is_empty() {
            day.remarks = Some(record.remarks.as_str());
        }
    }

    let mut column_sums: Vec<Decimal> = vec![Decimal::ZERO; actors.len()];
    let mut rows = Vec::with_capacity(span.days_in_month() as usize);

    for date in span.days() {
        let day = by_date.get(&date);
        let mut actor_hours = BTreeMap::new();
        let mut row_sum = Decimal::ZERO;

        for (idx, actor) in actors.iter().enumerate() {
            let hours = day
                .and_then(|d| d.hours.get(actor.as_str()).copied())
                .unwrap_or(Decimal::ZERO);
            row_sum += hours;
            column_sums[idx] += hours;
            actor_hours.insert(actor.clone(), format_cell(hours));
        }

        rows.push(RowView {
            date,
            day_of_week: labels.label(date.weekday()).to_string(),
            actor_hours,
            row_total: format_cell(row_sum),
            remarks: day
                .and_then(|d| d.remarks)
                .unwrap_or_default()
                .to_string(),
        });
    }

    let grand: Decimal = column_sums.iter().sum();
    let column_totals = actors
        .iter()
        .zip(&column_sums)
        .map(|(actor, sum)| (actor.clone(), format_total(*sum)))
        .collect();

    ScheduleTable {
        year: span.year,
        month: span.month,
        actor_names: actors.to_vec(),
        rows,
        column_totals,
        grand_total: format_total(grand),
    }
}

/// Renders a cell: zero is blank, integral values drop the decimal point.
pub fn format_cell(hours: Decimal) -> String {
    if hours.is_zero() {
        String::new()
    } else {
        format_total(hours)
    }
}

/// Renders a total: like [`format_cell`] but zero shows as `"0"`.
pub fn format_total(hours: Decimal) -> String {
    hours.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::StaticRoster;
    use crate::store::memory::MemoryTable;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::str::FromStr;

    fn date(raw: &str) -> CalendarDate {
        CalendarDate::parse(raw).unwrap()
    }

    fn dec(raw: &str) -> Decimal {
        Decimal::from_str(raw).unwrap()
    }

    fn builder(records: &[HourRecord], actors: &[&str]) -> TableBuilder {
        let ledger = MemoryTable::<HourRecord>::new();
        for r in records {
            ledger.insert(r).unwrap();
        }
        TableBuilder::new(
            Arc::new(ledger),
            Arc::new(StaticRoster::new(actors.iter().copied()).unwrap()),
        )
    }

    #[test]
    fn test_february_two_actors() {
        let table = builder(
            &[
                HourRecord::new(date("2025-02-03"), "Kim", dec("8.0")),
                HourRecord::new(date("2025-02-03"), "Lee", dec("4.5")),
            ],
            &["Kim", "Lee"],
        )
        .build_table(2025, 2)
        .unwrap();

        assert_eq!(table.rows.len(), 28);
        let row = &table.rows[2];
        assert_eq!(row.date, date("2025-02-03"));
        assert_eq!(row.day_of_week, "월");
        assert_eq!(row.actor_hours["Kim"], "8");
        assert_eq!(row.actor_hours["Lee"], "4.5");
        assert_eq!(row.row_total, "12.5");

        for other in table.rows.iter().filter(|r| r.date != row.date) {
            assert!(other.actor_hours.values().all(String::is_empty));
            assert_eq!(other.row_total, "");
        }
        assert_eq!(table.column_totals["Kim"], "8");
        assert_eq!(table.column_totals["Lee"], "4.5");
        assert_eq!(table.grand_total, "12.5");
    }

    #[test]
    fn test_empty_month_is_dense_with_zero_totals() {
        let table = builder(&[], &["Kim", "Lee"]).build_table(2024, 2).unwrap();
        assert_eq!(table.rows.len(), 29);
        assert!(table.rows.iter().all(|r| r.row_total.is_empty()));
        assert_eq!(table.column_totals["Kim"], "0");
        assert_eq!(table.grand_total, "0");
    }

    #[test]
    fn test_row_count_follows_calendar() {
        for (month, days) in [(1, 31), (4, 30), (2, 28), (12, 31)] {
            let table = builder(&[], &["Kim"]).build_table(2025, month).unwrap();
            assert_eq!(table.rows.len(), days);
        }
    }

    #[test]
    fn test_invalid_month_rejected() {
        assert!(builder(&[], &["Kim"]).build_table(2025, 13).is_err());
    }

    #[test]
    fn test_off_roster_records_are_excluded() {
        let table = builder(
            &[
                HourRecord::new(date("2025-02-03"), "Kim", dec("3")),
                HourRecord::new(date("2025-02-03"), "Ghost", dec("5")),
            ],
            &["Kim"],
        )
        .build_table(2025, 2)
        .unwrap();
        assert_eq!(table.rows[2].row_total, "3");
        assert_eq!(table.grand_total, "3");
    }

    #[test]
    fn test_remarks_and_english_labels() {
        let table = builder(
            &[
                HourRecord::new(date("2025-02-03"), "Kim", dec("2")),
                HourRecord::new(date("2025-02-03"), "Lee", dec("2")).with_remarks("tech run"),
            ],
            &["Kim", "Lee"],
        )
        .with_labels(WeekdayLabels::En)
        .build_table(2025, 2)
        .unwrap();
        assert_eq!(table.rows[2].remarks, "tech run");
        assert_eq!(table.rows[2].day_of_week, "Mon");
        assert_eq!(table.rows[0].remarks, "");
    }

    #[test]
    fn test_json_shape() {
        let table = builder(&[], &["Kim"]).build_table(2025, 2).unwrap();
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["rows"][0]["date"], "2025-02-01");
        assert_eq!(json["grand_total"], "0");
        assert_eq!(json["actor_names"][0], "Kim");
    }

    #[test]
    fn test_totals_invariant_randomized() {
        let mut rng = SmallRng::seed_from_u64(42);
        let actors: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        let span = MonthSpan::new(2025, 3).unwrap();

        for _ in 0..100 {
            let mut records: Vec<HourRecord> = Vec::new();
            for _ in 0..rng.random_range(0..40) {
                let day = rng.random_range(1..=31);
                let who = &actors[rng.random_range(0..actors.len())];
                // Quarter-hour steps in [0, 12].
                let hours = Decimal::new(rng.random_range(0..=48) * 25, 2);
                let d = CalendarDate::from_ymd(2025, 3, day).unwrap();
                if !records.iter().any(|r| r.date == d && &r.person_name == who) {
                    records.push(HourRecord::new(d, who.clone(), hours));
                }
            }

            let table = project(span, &actors, &records, WeekdayLabels::Ko);
            let parse = |s: &str| {
                if s.is_empty() {
                    Decimal::ZERO
                } else {
                    dec(s)
                }
            };

            assert_eq!(table.rows.len(), 31);
            for row in &table.rows {
                let sum: Decimal = row.actor_hours.values().map(|v| parse(v)).sum();
                assert_eq!(sum, parse(&row.row_total));
            }
            let columns: Decimal = table.column_totals.values().map(|v| parse(v)).sum();
            assert_eq!(columns, parse(&table.grand_total));
            let expected: Decimal = records.iter().map(|r| r.hours).sum();
            assert_eq!(parse(&table.grand_total), expected);
        }
    }
}
