//! BuzzGram CLI - browse the directory and manage accounts from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in as a consumer (password from BUZZGRAM_PASSWORD or --password)
//! buzzgram login -e ana@example.com
//!
//! # Browse a city, narrowed by category and search term
//! buzzgram city 3 --category 5 --search cafe
//!
//! # Business owner workflows use their own session
//! buzzgram owner login -e sam@shop.com
//! buzzgram owner businesses
//!
//! # Admin moderation
//! buzzgram admin approvals --status pending
//! buzzgram admin reject <approval-id> --notes "Could not verify ownership"
//!
//! # Where would the app send me for this path?
//! buzzgram guard /business-owner/dashboard
//! ```
//!
//! Sessions persist in `BUZZGRAM_STATE_FILE` between runs.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use buzzgram_client::{App, ClientConfig};
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "buzzgram")]
#[command(author, version, about = "BuzzGram directory client")]
struct Cli {
    /// Backend origin (overrides `BUZZGRAM_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in as a consumer or admin
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "BUZZGRAM_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account (email confirmation required before sign-in)
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        name: String,
        #[arg(short, long, env = "BUZZGRAM_PASSWORD", hide_env_values = true)]
        password: String,
        /// `customer` or `business_owner`
        #[arg(short = 't', long, default_value = "customer")]
        user_type: String,
        /// Required for business owners
        #[arg(long)]
        business_name: Option<String>,
        /// Required for business owners
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        instagram: Option<String>,
    },
    /// Sign out of the consumer session
    Logout,
    /// Show both sessions
    Whoami,
    /// Change the consumer account password
    ChangePassword {
        #[arg(long, env = "BUZZGRAM_PASSWORD", hide_env_values = true)]
        current: String,
        #[arg(long, env = "BUZZGRAM_NEW_PASSWORD", hide_env_values = true)]
        new: String,
    },
    /// List cities
    Cities,
    /// Browse a city's businesses
    City {
        city_id: i32,
        #[arg(long)]
        category: Option<i32>,
        #[arg(long)]
        subcategory: Option<i32>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a business
    Business { id: i32 },
    /// List favorites, or toggle one with `--toggle <business-id>`
    Favorites {
        #[arg(long)]
        toggle: Option<i32>,
    },
    /// Send a quote request to every provider in a subcategory
    Quote {
        #[arg(long)]
        category: i32,
        #[arg(long)]
        subcategory: i32,
        #[arg(long)]
        city: Option<i32>,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(short, long)]
        description: String,
        #[arg(long)]
        budget: Option<String>,
    },
    /// Business owner commands
    Owner {
        #[command(subcommand)]
        action: commands::owner::OwnerAction,
    },
    /// Admin commands
    Admin {
        #[command(subcommand)]
        action: commands::admin::AdminAction,
    },
    /// Show the guard decision for a path with the current sessions
    Guard { path: String },
    /// Check that the backend is reachable
    Health,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let environment = if cfg!(debug_assertions) {
        "development"
    } else {
        "production"
    };
    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(environment.into()),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.api_url.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "buzzgram=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli.command, config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn load_config(api_url: Option<&str>) -> Result<ClientConfig, CliError> {
    let config = ClientConfig::from_env()?;
    let Some(origin) = api_url else {
        return Ok(config);
    };
    let overridden = ClientConfig::for_origin(origin)?;
    Ok(ClientConfig {
        api_base: overridden.api_base,
        ..config
    })
}

async fn run(command: Commands, config: ClientConfig) -> Result<(), CliError> {
    let app = App::from_config(config)?;
    app.init().await;

    match command {
        Commands::Login { email, password } => {
            commands::account::login(&app, &email, password).await?;
        }
        Commands::Register {
            email,
            name,
            password,
            user_type,
            business_name,
            phone,
            instagram,
        } => {
            let form = commands::account::registration_form(
                email,
                name,
                password,
                &user_type,
                business_name,
                phone,
                instagram,
            )?;
            commands::account::register(&app, form).await?;
        }
        Commands::Logout => commands::account::logout(&app).await,
        Commands::Whoami => commands::account::whoami(&app).await,
        Commands::ChangePassword { current, new } => {
            commands::account::change_password(&app, current, new).await?;
        }
        Commands::Cities => commands::catalog::cities(&app).await?,
        Commands::City {
            city_id,
            category,
            subcategory,
            search,
        } => {
            commands::catalog::city(&app, city_id, category, subcategory, search).await?;
        }
        Commands::Business { id } => commands::catalog::business(&app, id).await?,
        Commands::Favorites { toggle } => commands::catalog::favorites(&app, toggle).await?,
        Commands::Quote {
            category,
            subcategory,
            city,
            name,
            email,
            phone,
            description,
            budget,
        } => {
            let request = commands::catalog::QuoteArgs {
                category,
                subcategory,
                city,
                name,
                email,
                phone,
                description,
                budget,
            };
            commands::catalog::quote(&app, request).await?;
        }
        Commands::Owner { action } => commands::owner::run(&app, action).await?,
        Commands::Admin { action } => commands::admin::run(&app, action).await?,
        Commands::Guard { path } => commands::catalog::guard(&app, &path).await,
        Commands::Health => commands::catalog::health(&app).await?,
    }
    Ok(())
}
