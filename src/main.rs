//! rota: command-line front end for the schedule service.
//!
//! Runs as an administrator principal against the configured SQLite
//! database and prints results as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use u_rota::{Config, ScheduleService, Viewer};

#[derive(Parser)]
#[command(name = "rota")]
#[command(about = "Venue shift coordination: submissions, time slots, confirmation, hours")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "rota.toml", env = "ROTA_CONFIG")]
    config: PathBuf,

    /// Database file (overrides config file)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Name recorded as the acting administrator
    #[arg(long, default_value = "admin", env = "ROTA_ADMIN")]
    admin: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the monthly hours table
    Table { year: i32, month: u32 },

    /// Confirm (Y) or reopen (N) a day
    Confirm { date: String, confirmed: String },

    /// Show whether a day is confirmed
    Status { date: String },

    /// Record a person's availability
    Submit {
        date: String,
        person_id: String,
        person_name: String,
        #[arg(long, default_value = "")]
        role: String,
        /// Mark the day as requested
        #[arg(long)]
        open_hope: bool,
    },

    /// List a month's submissions
    Submissions { year: i32, month: u32 },

    /// Assign a theme and performers to a time slot
    Assign {
        date: String,
        time_of_day: String,
        #[arg(long, default_value = "")]
        theme: String,
        /// Comma-separated performer names
        #[arg(long, default_value = "")]
        performers: String,
    },

    /// List a day's time slots
    Slots { date: String },

    /// Record hours worked
    LogHours {
        date: String,
        person_name: String,
        hours: Decimal,
        #[arg(long, default_value = "")]
        remarks: String,
    },

    /// Read or replace the venue note
    Note {
        #[command(subcommand)]
        action: NoteAction,
    },
}

#[derive(Subcommand)]
enum NoteAction {
    Show,
    Set { content: String },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("u_rota=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(database) = cli.database {
        config.database_path = database;
    }
    debug!(database = %config.database_path.display(), "config loaded");

    let service = ScheduleService::from_config(&config).context("opening schedule database")?;
    let admin = Viewer::admin(cli.admin.clone(), cli.admin);

    match cli.command {
        Command::Table { year, month } => print_json(&service.get_monthly_table(year, month)?),
        Command::Confirm { date, confirmed } => {
            print_json(&service.set_confirmation(&admin, &date, &confirmed)?)
        }
        Command::Status { date } => print_json(&service.day_confirmation(&date)?),
        Command::Submit {
            date,
            person_id,
            person_name,
            role,
            open_hope,
        } => print_json(&service.submit_availability(
            &admin,
            &date,
            &person_id,
            &person_name,
            &role,
            open_hope,
        )?),
        Command::Submissions { year, month } => {
            print_json(&service.get_visible_submissions(year, month, &admin)?)
        }
        Command::Assign {
            date,
            time_of_day,
            theme,
            performers,
        } => print_json(&service.assign_time_slot(&date, &time_of_day, &theme, &performers)?),
        Command::Slots { date } => print_json(&service.get_visible_time_slots(&date, &admin)?),
        Command::LogHours {
            date,
            person_name,
            hours,
            remarks,
        } => print_json(&service.log_hours(&date, &person_name, hours, &remarks)?),
        Command::Note { action } => match action {
            NoteAction::Show => print_json(&service.get_note()?),
            NoteAction::Set { content } => print_json(&service.save_note(&admin, &content)?),
        },
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
