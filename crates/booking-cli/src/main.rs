//! `bookings` CLI — query booking-calendar availability from a JSON snapshot.
//!
//! ## Usage
//!
//! ```sh
//! # Days that cannot start a booking in March (snapshot on stdin)
//! bookings disabled --from 2025-03-01 --to 2025-03-31 < snapshot.json
//!
//! # Days that cannot end a booking starting on 2025-03-10, for item 42
//! bookings disabled -i snapshot.json --from 2025-03-01 --to 2025-03-31 \
//!     --start 2025-03-10 --item 42
//!
//! # Markers for one calendar cell
//! bookings markers -i snapshot.json --date 2025-03-12
//!
//! # Validate a selection (exit status 2 when invalid)
//! bookings validate -i snapshot.json --start 2025-03-10 --end 2025-03-14
//!
//! # Narrow the selectors given current picks
//! bookings filter -i snapshot.json --location CPL --type BOOK
//!
//! # Override the snapshot's policy
//! bookings disabled -i snapshot.json --from 2025-03-01 --to 2025-03-31 \
//!     --lead-days 2 --trail-days 1 --max-period 14 --end-date-only
//! ```

use anyhow::{Context, Result};
use booking_engine::{
    build_index, BookingId, CalendarDay, CalendarSnapshot, ConstraintMode, DisablePredicate,
    ResourceId, Selection, SelectionContext,
};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::process;

#[derive(Parser)]
#[command(
    name = "bookings",
    version,
    about = "Booking calendar availability CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug details (skipped rows, index size) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Where the snapshot comes from and which day counts as today.
#[derive(Args)]
struct SnapshotArgs {
    /// Snapshot JSON file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Reference date for "today" (defaults to the local date)
    #[arg(long)]
    today: Option<CalendarDay>,
    /// Id of a booking being edited; it does not conflict with itself
    #[arg(long)]
    editing: Option<String>,
}

/// Overrides for the snapshot's circulation policy.
#[derive(Args)]
struct PolicyArgs {
    /// Days of advance notice before a booking may start
    #[arg(long)]
    lead_days: Option<u32>,
    /// Days a resource rests after a booking ends
    #[arg(long)]
    trail_days: Option<u32>,
    /// Longest booking in days (0 = uncapped)
    #[arg(long)]
    max_period: Option<u32>,
    /// Only a start date is picked; the end date follows from the policy
    #[arg(long)]
    end_date_only: bool,
    /// Externally calculated due date used as the end in end-date-only mode
    #[arg(long)]
    due_date: Option<CalendarDay>,
}

#[derive(Subcommand)]
enum Commands {
    /// List disabled days in a window, one per line
    Disabled {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        #[command(flatten)]
        policy: PolicyArgs,
        /// First day of the window
        #[arg(long)]
        from: CalendarDay,
        /// Last day of the window
        #[arg(long)]
        to: CalendarDay,
        /// Already selected start date (switches to end-date selection)
        #[arg(long)]
        start: Option<CalendarDay>,
        /// Restrict to a single resource
        #[arg(long)]
        item: Option<String>,
    },
    /// Print the markers recorded on one day as JSON
    Markers {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        #[command(flatten)]
        policy: PolicyArgs,
        /// Day to project
        #[arg(long)]
        date: CalendarDay,
    },
    /// Validate a selection and print the result as JSON
    Validate {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        #[command(flatten)]
        policy: PolicyArgs,
        /// Selected start date
        #[arg(long)]
        start: Option<CalendarDay>,
        /// Selected end date (requires --start)
        #[arg(long, requires = "start")]
        end: Option<CalendarDay>,
        /// Restrict to a single resource
        #[arg(long)]
        item: Option<String>,
    },
    /// Print the span highlighted once a start date is chosen
    Highlight {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        #[command(flatten)]
        policy: PolicyArgs,
        /// Chosen start date
        #[arg(long)]
        start: CalendarDay,
    },
    /// Narrow pickup locations, item types, and resources given current picks
    Filter {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        /// Selected pickup location id
        #[arg(long)]
        location: Option<String>,
        /// Selected item type
        #[arg(long = "type")]
        item_type: Option<String>,
        /// Selected resource id
        #[arg(long)]
        item: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Disabled {
            snapshot: source,
            policy,
            from,
            to,
            start,
            item,
        } => {
            let snapshot = load_snapshot(&source, &policy)?;
            let selection = match start {
                Some(start) => Selection::Start(start),
                None => Selection::Empty,
            };
            let context = SelectionContext {
                selection,
                target_resource: item.map(ResourceId::new),
                editing_booking: source.editing.as_deref().map(BookingId::from),
            };
            let index = build_index(
                snapshot.inputs(),
                &snapshot.policy,
                context.editing_booking.as_ref(),
            );
            let predicate = DisablePredicate::new(
                &index,
                &snapshot.resources,
                &context,
                &snapshot.policy,
                today(&source),
            );
            let days = predicate.disabled_days(from, to);
            tracing::debug!(count = days.len(), "disabled days in window");
            let lines: String = days.iter().map(|d| format!("{d}\n")).collect();
            print!("{}", lines);
        }
        Commands::Markers {
            snapshot: source,
            policy,
            date,
        } => {
            let snapshot = load_snapshot(&source, &policy)?;
            let editing = source.editing.as_deref().map(BookingId::from);
            let index = build_index(snapshot.inputs(), &snapshot.policy, editing.as_ref());
            let markers =
                booking_engine::markers_for_date(Some(&index), date, &snapshot.resources);
            let counts = booking_engine::aggregate_markers(&markers);
            print_json(&serde_json::json!({ "markers": markers, "counts": counts }))?;
        }
        Commands::Validate {
            snapshot: source,
            policy,
            start,
            end,
            item,
        } => {
            let snapshot = load_snapshot(&source, &policy)?;
            let selection = match (start, end) {
                (Some(start), Some(end)) => Selection::Complete(start, end),
                (Some(start), None) => Selection::Start(start),
                (None, _) => Selection::Empty,
            };
            let target = item.map(ResourceId::new);
            let editing = source.editing.as_deref().map(BookingId::from);
            let result = booking_engine::validate_range(
                selection,
                snapshot.inputs(),
                &snapshot.policy,
                target.as_ref(),
                editing.as_ref(),
                today(&source),
            );
            print_json(&result)?;
            if !result.valid {
                process::exit(2);
            }
        }
        Commands::Highlight {
            snapshot: source,
            policy,
            start,
        } => {
            let snapshot = load_snapshot(&source, &policy)?;
            print_json(&booking_engine::constraint_highlight(start, &snapshot.policy))?;
        }
        Commands::Filter {
            snapshot: source,
            location,
            item_type,
            item,
        } => {
            let snapshot = load_snapshot(&source, &PolicyArgs::none())?;
            let location = match location.as_deref() {
                Some(id) => Some(
                    snapshot
                        .pickup_locations
                        .iter()
                        .find(|loc| loc.id == id)
                        .with_context(|| format!("Unknown pickup location: {}", id))?,
                ),
                None => None,
            };
            let item = item.map(ResourceId::new);
            let locations = booking_engine::filter_pickup_locations(
                &snapshot.pickup_locations,
                &snapshot.resources,
                item.as_ref(),
                item_type.as_deref(),
            );
            let item_types = booking_engine::filter_item_types(
                &snapshot.item_types,
                &snapshot.resources,
                location,
                item.as_ref(),
            );
            let resources = booking_engine::filter_resources(
                &snapshot.resources,
                location,
                item_type.as_deref(),
            );
            print_json(&serde_json::json!({
                "pickupLocations": locations,
                "itemTypes": item_types,
                "resources": resources,
            }))?;
        }
    }

    Ok(())
}

impl PolicyArgs {
    fn none() -> Self {
        Self {
            lead_days: None,
            trail_days: None,
            max_period: None,
            end_date_only: false,
            due_date: None,
        }
    }
}

/// Install a stderr logger so stdout stays machine-readable.
fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();
}

/// Read the snapshot and apply command-line policy overrides on top of it.
fn load_snapshot(source: &SnapshotArgs, overrides: &PolicyArgs) -> Result<CalendarSnapshot> {
    let json = read_input(source.input.as_deref())?;
    let mut snapshot =
        CalendarSnapshot::from_json(&json).context("Failed to parse snapshot JSON")?;

    let policy = &mut snapshot.policy;
    if let Some(lead) = overrides.lead_days {
        policy.lead_days = lead;
    }
    if let Some(trail) = overrides.trail_days {
        policy.trail_days = trail;
    }
    if let Some(max) = overrides.max_period {
        policy.max_period = Some(max);
    }
    if overrides.end_date_only {
        policy.constraint_mode = ConstraintMode::EndDateOnly;
    }
    if let Some(due) = overrides.due_date {
        policy.due_date_override = Some(due);
    }

    tracing::debug!(
        resources = snapshot.resources.len(),
        bookings = snapshot.bookings.len(),
        checkouts = snapshot.checkouts.len(),
        holidays = snapshot.holidays.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

fn today(source: &SnapshotArgs) -> CalendarDay {
    source.today.unwrap_or_else(CalendarDay::today)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value)?;
    println!("{}", pretty);
    Ok(())
}
