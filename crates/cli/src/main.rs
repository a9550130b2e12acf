//! Booking console CLI - operate the booking admin from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (password read from stdin when --password is omitted)
//! booking-console login -u admin
//!
//! # Overview of all service lines
//! booking-console dashboard
//!
//! # Bookings of one service line
//! booking-console bookings moving list
//! booking-console bookings cleaning update 66f1c0ffee0123456789abcd --status confirmed
//!
//! # Lock a date for move-out cleaning
//! booking-console locked-dates cleaning add 2025-12-24
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `register` - Session and admin accounts
//! - `dashboard` - Totals, today's and upcoming bookings, recent bookings
//! - `bookings` - List, show, update, delete and confirm bookings
//! - `locked-dates` - Dates on which a service line takes no bookings
//! - `discounts` - Discount codes
//! - `prices` - Price lists
//! - `contacts` / `phones` - Leads
//!
//! # Environment Variables
//!
//! See [`booking_console_admin::config`]. `LOG_FORMAT=json` switches log
//! output to JSON; `RUST_LOG` overrides the log filter.

#![cfg_attr(not(test), forbid(unsafe_code))]

use booking_console_admin::api::PriceList;
use booking_console_admin::config::ConsoleConfig;
use booking_console_admin::guard::{Route, RouteGuard};
use booking_console_admin::AppState;
use booking_console_core::{PhoneLeadStatus, ServiceLine};
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::bookings::BookingChanges;
use commands::discounts::NewDiscount;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "booking-console")]
#[command(author, version, about = "Booking admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        #[arg(short, long)]
        username: String,

        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Clear the stored session
    Logout,
    /// Create another admin account
    Register {
        #[arg(short, long)]
        username: String,

        /// Read from stdin (twice, for confirmation) when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Booking totals and the most recent bookings
    Dashboard,
    /// Manage bookings of a service line (moving, cleaning, bygg)
    Bookings {
        service: ServiceLine,

        #[command(subcommand)]
        action: BookingAction,
    },
    /// Manage locked dates of a service line
    LockedDates {
        service: ServiceLine,

        #[command(subcommand)]
        action: LockedDateAction,
    },
    /// Manage discount codes
    Discounts {
        #[command(subcommand)]
        action: DiscountAction,
    },
    /// Show or edit a price list (moving, cleaning)
    Prices {
        list: PriceList,

        #[command(subcommand)]
        action: PriceAction,
    },
    /// Corporate-cleaning enquiries
    Contacts {
        #[command(subcommand)]
        action: ContactAction,
    },
    /// Call-me-back requests
    Phones {
        #[command(subcommand)]
        action: PhoneAction,
    },
}

#[derive(Subcommand)]
enum BookingAction {
    /// List all bookings
    List,
    /// Show one booking
    Show { id: String },
    /// Edit a booking; unspecified fields keep their current value
    Update {
        id: String,

        #[command(flatten)]
        changes: BookingChanges,
    },
    /// Delete a booking
    Delete { id: String },
    /// Send the confirmation email
    Confirm { id: String },
}

#[derive(Subcommand)]
enum LockedDateAction {
    /// List locked dates in calendar order
    List,
    /// Lock a date (YYYY-MM-DD)
    Add { date: String },
    /// Unlock a date (YYYY-MM-DD)
    Remove { date: String },
}

#[derive(Subcommand)]
enum DiscountAction {
    /// List discount codes
    List,
    /// Create a discount code
    Create(NewDiscount),
    /// Delete a discount by id or code
    Delete { reference: String },
}

#[derive(Subcommand)]
enum PriceAction {
    /// Show the current prices
    Show,
    /// Change prices, e.g. `pricePerKvm=45 travelFee=350`
    Set {
        #[arg(required = true, value_parser = commands::parse_key_value)]
        values: Vec<(String, String)>,
    },
}

#[derive(Subcommand)]
enum ContactAction {
    /// List enquiries
    List {
        /// Free-text filter over name, email, subject, phone, city and address
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Delete an enquiry
    Delete { id: String },
}

#[derive(Subcommand)]
enum PhoneAction {
    /// List phone leads
    List {
        #[arg(long)]
        service: Option<ServiceLine>,

        /// `Ingen status`, `Ska ringa upp` or `Har Ringt`
        #[arg(long)]
        status: Option<PhoneLeadStatus>,
    },
    /// Change the follow-up status of a lead
    Status { id: String, status: PhoneLeadStatus },
    /// Delete a lead
    Delete { id: String },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ConsoleConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            send_default_pii: false,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "booking_console_admin=info,booking_console_cli=info".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration first (needed for Sentry init)
    let config = ConsoleConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let result: Result<(), Box<dyn std::error::Error>> = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        // Flush pending Sentry events; exit skips destructors
        drop(sentry_guard);
        std::process::exit(1);
    }
}

/// Screen a command opens, checked by the route guard before it runs.
fn route_of(command: &Commands) -> Route {
    match command {
        Commands::Login { .. } | Commands::Logout => Route::Login,
        Commands::Register { .. } => Route::Register,
        Commands::Dashboard => Route::Dashboard,
        Commands::Bookings { service, action } => match action {
            BookingAction::Show { id }
            | BookingAction::Update { id, .. }
            | BookingAction::Delete { id }
            | BookingAction::Confirm { id } => Route::BookingDetail(*service, id.as_str().into()),
            BookingAction::List => Route::Bookings(*service),
        },
        Commands::LockedDates { service, .. } => Route::LockedDates(*service),
        Commands::Discounts { .. } => Route::Discounts,
        Commands::Prices { list, .. } => Route::Prices(*list),
        Commands::Contacts { .. } => Route::Contacts,
        Commands::Phones { .. } => Route::PhoneLeads,
    }
}

async fn run(cli: Cli, config: ConsoleConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::with_file_store(config);
    let guard = RouteGuard::new(state.store().clone());
    let route = guard
        .enter(route_of(&cli.command))
        .map_err(commands::CommandError::from)?;
    tracing::debug!(%route, "Entered");

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&state, &username, password).await?;
        }
        Commands::Logout => commands::auth::logout(&guard)?,
        Commands::Register { username, password } => {
            commands::auth::register(&state, &username, password).await?;
        }
        Commands::Dashboard => commands::dashboard::show(&state).await?,
        Commands::Bookings { service, action } => match action {
            BookingAction::List => commands::bookings::list(&state, service).await?,
            BookingAction::Show { id } => commands::bookings::show(&state, service, id).await?,
            BookingAction::Update { id, changes } => {
                commands::bookings::update(&state, service, id, &changes).await?;
            }
            BookingAction::Delete { id } => commands::bookings::delete(&state, service, id).await?,
            BookingAction::Confirm { id } => {
                commands::bookings::confirm(&state, service, id).await?;
            }
        },
        Commands::LockedDates { service, action } => match action {
            LockedDateAction::List => commands::locked_dates::list(&state, service).await?,
            LockedDateAction::Add { date } => {
                commands::locked_dates::add(&state, service, &date).await?;
            }
            LockedDateAction::Remove { date } => {
                commands::locked_dates::remove(&state, service, &date).await?;
            }
        },
        Commands::Discounts { action } => match action {
            DiscountAction::List => commands::discounts::list(&state).await?,
            DiscountAction::Create(new) => commands::discounts::create(&state, &new).await?,
            DiscountAction::Delete { reference } => {
                commands::discounts::delete(&state, &reference).await?;
            }
        },
        Commands::Prices { list, action } => match action {
            PriceAction::Show => commands::prices::show(&state, list).await?,
            PriceAction::Set { values } => commands::prices::set(&state, list, &values).await?,
        },
        Commands::Contacts { action } => match action {
            ContactAction::List { search } => {
                commands::leads::list_contacts(&state, search.as_deref()).await?;
            }
            ContactAction::Delete { id } => commands::leads::delete_contact(&state, id).await?,
        },
        Commands::Phones { action } => match action {
            PhoneAction::List { service, status } => {
                commands::leads::list_phones(&state, service, status).await?;
            }
            PhoneAction::Status { id, status } => {
                commands::leads::set_phone_status(&state, id, status).await?;
            }
            PhoneAction::Delete { id } => commands::leads::delete_phone(&state, id).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_route_of_commands() {
        let cli = Cli::try_parse_from(["booking-console", "bookings", "flytt", "show", "abc123"])
            .unwrap();
        assert_eq!(
            route_of(&cli.command),
            Route::BookingDetail(ServiceLine::Moving, "abc123".into())
        );

        let cli = Cli::try_parse_from(["booking-console", "login", "-u", "admin"]).unwrap();
        assert!(!route_of(&cli.command).is_protected());

        let cli = Cli::try_parse_from(["booking-console", "register", "-u", "admin"]).unwrap();
        assert!(route_of(&cli.command).is_protected());

        let cli = Cli::try_parse_from([
            "booking-console",
            "phones",
            "list",
            "--status",
            "Ska ringa upp",
        ])
        .unwrap();
        assert_eq!(route_of(&cli.command), Route::PhoneLeads);
    }

    #[test]
    fn test_price_values_parse() {
        let cli = Cli::try_parse_from([
            "booking-console",
            "prices",
            "cleaning",
            "set",
            "pricePerKvm=45",
            "fixedPrice=1 200,50",
        ])
        .unwrap();
        let Commands::Prices {
            list,
            action: PriceAction::Set { values },
        } = cli.command
        else {
            panic!("expected prices set");
        };
        assert_eq!(list, PriceList::Cleaning);
        assert_eq!(values[1], ("fixedPrice".to_string(), "1 200,50".to_string()));
    }
}
