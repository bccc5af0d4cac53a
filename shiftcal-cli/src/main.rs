mod commands;
mod render;
mod utils;

use std::io::IsTerminal;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shiftcal_core::ViewMode;
use shiftcal_core::shift::ShiftType;
use tracing_subscriber::EnvFilter;

use commands::Session;

#[derive(Parser)]
#[command(name = "shiftcal")]
#[command(about = "Plan your shifts in a month, week or day calendar with iCal feeds and weather")]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the calendar
    Show {
        /// month, week or day (defaults to default_view from config)
        #[arg(long)]
        view: Option<ViewMode>,

        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,

        /// Move this many views forward (or back, if negative)
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,

        /// Skip fetching iCal feeds
        #[arg(long)]
        no_feeds: bool,

        /// Also show the weather sidebar
        #[arg(short, long)]
        weather: bool,
    },
    /// Manage shifts
    Shift {
        #[command(subcommand)]
        action: ShiftAction,
    },
    /// Manage local events
    Event {
        #[command(subcommand)]
        action: EventAction,
    },
    /// Manage iCal feed subscriptions
    Feed {
        #[command(subcommand)]
        action: FeedAction,
    },
    /// Show current weather and forecast
    Weather,
    /// Show configuration paths and settings
    Config,
}

#[derive(Subcommand)]
enum ShiftAction {
    /// Assign a shift to a date, replacing any existing one
    Set {
        /// Date (YYYY-MM-DD)
        date: String,

        /// morning, afternoon or rest
        kind: ShiftType,

        /// Start time (HH:MM), defaults to the shift type's start
        #[arg(long)]
        start: Option<String>,

        /// End time (HH:MM), defaults to the shift type's end
        #[arg(long)]
        end: Option<String>,
    },
    /// Remove the shift on a date
    Delete {
        /// Date (YYYY-MM-DD)
        date: String,
    },
    /// List shifts (defaults to the current month)
    List {
        #[arg(long)]
        from: Option<String>,

        /// Inclusive end date
        #[arg(long)]
        to: Option<String>,
    },
}

#[derive(Subcommand)]
enum EventAction {
    /// Create a local event
    Add {
        title: String,

        /// Start date/time (e.g. "2025-03-20" or "2025-03-20T15:00")
        #[arg(short, long)]
        start: String,

        /// End date/time, defaults to one hour after start (all-day events end the next midnight)
        #[arg(short, long)]
        end: Option<String>,

        /// Treat the event as all-day
        #[arg(long)]
        all_day: bool,

        #[arg(long)]
        description: Option<String>,

        #[arg(short, long)]
        location: Option<String>,
    },
    /// Delete a local event by id
    Remove { id: String },
    /// List local events
    List,
}

#[derive(Subcommand)]
enum FeedAction {
    /// Subscribe to an iCal feed (http, https or webcal URL)
    Add { url: String },
    /// Unsubscribe from an iCal feed
    Remove { url: String },
    /// List subscribed feeds
    List,
    /// Fetch every feed and report how many events each returned
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut session = Session::open()?;

    let result = match cli.command {
        Commands::Show {
            view,
            date,
            offset,
            no_feeds,
            weather,
        } => {
            let options = commands::show::ShowOptions {
                view,
                date,
                offset,
                feeds: !no_feeds,
                weather,
            };
            commands::show::run(&session, options).await
        }
        Commands::Shift { action } => match action {
            ShiftAction::Set {
                date,
                kind,
                start,
                end,
            } => commands::shift::set(&mut session, &date, kind, start, end),
            ShiftAction::Delete { date } => commands::shift::delete(&mut session, &date),
            ShiftAction::List { from, to } => commands::shift::list(&session, from.as_deref(), to.as_deref()),
        },
        Commands::Event { action } => match action {
            EventAction::Add {
                title,
                start,
                end,
                all_day,
                description,
                location,
            } => {
                let input = commands::event::EventInput {
                    title,
                    start,
                    end,
                    all_day,
                    description,
                    location,
                };
                commands::event::add(&mut session, input)
            }
            EventAction::Remove { id } => commands::event::remove(&mut session, &id),
            EventAction::List => commands::event::list(&session),
        },
        Commands::Feed { action } => match action {
            FeedAction::Add { url } => commands::feed::add(&mut session, &url),
            FeedAction::Remove { url } => commands::feed::remove(&mut session, &url),
            FeedAction::List => commands::feed::list(&session),
            FeedAction::Check => commands::feed::check(&session).await,
        },
        Commands::Weather => commands::weather::run(&session).await,
        Commands::Config => commands::config::run(&session),
    };

    session.close()?;
    result
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_env("SHIFTCAL_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(error) = init_result {
        eprintln!("Could not initialize logging: {error}");
    }
}
