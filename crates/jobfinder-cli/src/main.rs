use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use jobfinder_api::{ApiClient, ApiConfig, AuthScheme, DEFAULT_API_URL};
use jobfinder_app_state::AppContext;
use jobfinder_storage::{Bridge, FileStore};
use tracing::{debug, error};
use tracing_subscriber::prelude::*;

mod account;
mod billing;
mod fetch;
mod output;

#[derive(Parser, Debug)]
#[command(name = "jobfinder", about = "Job Finder command-line client", version)]
struct Opts {
    /// Base URL of the Job Finder API
    #[arg(long, env = "PUBLIC_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// How the session token is sent: bearer or x-auth-token
    #[arg(long, env = "JOBFINDER_AUTH_SCHEME", default_value = "bearer", global = true)]
    auth_scheme: AuthScheme,

    /// Session storage file (defaults to the user data directory)
    #[arg(long, env = "JOBFINDER_STORAGE", global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account
    Signup(account::SignupArgs),

    /// Log in and remember the session
    Login(account::LoginArgs),

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Inspect or change the subscription
    #[command(subcommand)]
    Subscription(billing::SubscriptionCommands),

    /// Edit the job-seeker profile
    #[command(subcommand)]
    Profile(account::ProfileCommands),

    /// Send an authenticated request to the API
    Fetch(fetch::FetchArgs),
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let opts = Opts::parse();
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "failed to start async runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(opts)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(opts: Opts) -> anyhow::Result<ExitCode> {
    let context = build_context(&opts)?;
    let _printer = output::print_notifications(context.notifications());

    let restored = context.session().restore(context.api()).await;
    debug!(restored, "session restore finished");

    match dispatch(&context, opts.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            context.notifications().error(format!("{e:#}"));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn build_context(opts: &Opts) -> anyhow::Result<AppContext> {
    let config = ApiConfig::new(&opts.api_url).with_auth_scheme(opts.auth_scheme);
    let api = ApiClient::new(config).context("invalid API configuration")?;

    let store = match &opts.storage {
        Some(path) => FileStore::open(path),
        None => FileStore::open_default(),
    }
    .context("failed to open session storage")?;
    debug!(path = %store.path().display(), api_url = %api.base_url(), "context ready");

    Ok(AppContext::new(api, Bridge::new(store)))
}

async fn dispatch(context: &AppContext, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Signup(args) => account::signup(context, args).await,
        Command::Login(args) => account::login(context, args).await,
        Command::Logout => account::logout(context),
        Command::Whoami => account::whoami(context),
        Command::Subscription(cmd) => billing::run(context, cmd).await,
        Command::Profile(cmd) => account::profile(context, cmd),
        Command::Fetch(args) => fetch::run(context, args).await,
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
