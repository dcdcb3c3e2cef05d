//! End-to-end scenarios run against both store backends.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use u_rota::store::sqlite::SqliteDb;
use u_rota::{Confirmation, ScheduleService, StaticRoster, Stores, Viewer};

fn backends() -> Vec<(&'static str, Stores)> {
    let db = Arc::new(SqliteDb::open_in_memory().unwrap());
    vec![("memory", Stores::in_memory()), ("sqlite", Stores::sqlite(db))]
}

fn service(stores: Stores) -> ScheduleService {
    let roster = StaticRoster::new(["Kim", "Lee"]).unwrap();
    ScheduleService::new(stores, Arc::new(roster))
}

fn admin() -> Viewer {
    Viewer::admin("root", "Admin")
}

#[test]
fn test_monthly_table_for_february() {
    for (name, stores) in backends() {
        let svc = service(stores);
        svc.log_hours("2025-02-03", "Kim", Decimal::from_str("8.0").unwrap(), "")
            .unwrap();
        svc.log_hours("2025-02-03", "Lee", Decimal::from_str("4.5").unwrap(), "")
            .unwrap();

        let table = svc.get_monthly_table(2025, 2).unwrap();
        assert_eq!(table.rows.len(), 28, "{name}");
        assert_eq!(table.actor_names, vec!["Kim", "Lee"], "{name}");

        let row = table
            .rows
            .iter()
            .find(|r| r.date.to_string() == "2025-02-03")
            .unwrap();
        assert_eq!(row.actor_hours["Kim"], "8", "{name}");
        assert_eq!(row.actor_hours["Lee"], "4.5", "{name}");
        assert_eq!(row.row_total, "12.5", "{name}");

        let blank_rows = table
            .rows
            .iter()
            .filter(|r| r.row_total.is_empty() && r.actor_hours.values().all(String::is_empty))
            .count();
        assert_eq!(blank_rows, 27, "{name}");
        assert_eq!(table.column_totals["Kim"], "8", "{name}");
        assert_eq!(table.column_totals["Lee"], "4.5", "{name}");
        assert_eq!(table.grand_total, "12.5", "{name}");
    }
}

#[test]
fn test_confirmation_opens_visibility() {
    for (name, stores) in backends() {
        let svc = service(stores);
        svc.add_person_to_date(&admin(), "2025-02-10", "U1", "Kim")
            .unwrap();
        svc.add_person_to_date(&admin(), "2025-02-10", "U2", "Lee")
            .unwrap();
        let u1 = Viewer::member("U1", "Kim");

        let before = svc.get_visible_submissions(2025, 2, &u1).unwrap();
        assert_eq!(before.len(), 1, "{name}");
        assert_eq!(before[0].person_id, "U1", "{name}");

        svc.set_confirmation(&admin(), "2025-02-10", "Y").unwrap();
        let after = svc.get_visible_submissions(2025, 2, &u1).unwrap();
        assert_eq!(after.len(), 2, "{name}");
        assert!(after.iter().all(|s| s.confirmed == Confirmation::Y), "{name}");
    }
}

#[test]
fn test_time_of_day_is_stored_at_minute_granularity() {
    for (name, stores) in backends() {
        let svc = service(stores);
        svc.assign_time_slot("2025-03-01", "16:00:00", "Theme", "A,B")
            .unwrap();

        let slots = svc.get_visible_time_slots("2025-03-01", &admin()).unwrap();
        assert_eq!(slots.len(), 1, "{name}");
        assert_eq!(slots[0].time_of_day.to_string(), "16:00", "{name}");
        assert_eq!(slots[0].theme, "Theme", "{name}");
    }
}

#[test]
fn test_deleting_missing_submission_returns_false() {
    for (name, stores) in backends() {
        let svc = service(stores);
        let found = svc
            .delete_submission(&admin(), "2025-02-10", "nobody")
            .unwrap();
        assert!(!found, "{name}");
    }
}

#[test]
fn test_confirm_twice_then_reopen() {
    for (name, stores) in backends() {
        let svc = service(stores);
        svc.add_person_to_date(&admin(), "2025-02-10", "U1", "Kim")
            .unwrap();
        svc.assign_time_slot("2025-02-10", "14:00", "Opening", "Kim")
            .unwrap();

        svc.set_confirmation(&admin(), "2025-02-10", "Y").unwrap();
        svc.set_confirmation(&admin(), "2025-02-10", "Y").unwrap();
        assert_eq!(svc.day_confirmation("2025-02-10").unwrap(), Confirmation::Y, "{name}");

        svc.set_confirmation(&admin(), "2025-02-10", "N").unwrap();
        assert_eq!(svc.day_confirmation("2025-02-10").unwrap(), Confirmation::N, "{name}");
        let slots = svc.get_visible_time_slots("2025-02-10", &admin()).unwrap();
        assert_eq!(slots[0].confirmed, Confirmation::N, "{name}");
    }
}

#[test]
fn test_co_performers_hidden_until_confirmed() {
    for (name, stores) in backends() {
        let svc = service(stores);
        svc.assign_time_slot("2025-03-01", "16:00", "Theme", "Kim,Lee")
            .unwrap();
        let kim = Viewer::member("U1", "Kim");

        let open = svc.get_visible_time_slots("2025-03-01", &kim).unwrap();
        assert_eq!(open[0].performers.joined(), "Kim", "{name}");

        svc.set_confirmation(&admin(), "2025-03-01", "Y").unwrap();
        let confirmed = svc.get_visible_time_slots("2025-03-01", &kim).unwrap();
        assert_eq!(confirmed[0].performers.joined(), "Kim,Lee", "{name}");
    }
}
