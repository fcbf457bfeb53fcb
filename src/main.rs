use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

use workouts::config::{ClientConfig, ConfigError};
use workouts::error::RequestError;
use workouts::net::types::{Credentials, Registration, WorkoutDraft};
use workouts::retry::{RetryPolicy, retry_with_backoff};
use workouts::store::session::{FileTokenStore, SessionError, TokenStore};
use workouts::store::workouts::WorkoutList;
use workouts::{ApiClient, AuthApi, Session, WorkoutsApi};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuração inválida: {0}")]
    Config(#[from] ConfigError),
    #[error("sessão local indisponível: {0}")]
    Session(#[from] SessionError),
    #[error("{0}")]
    Request(#[from] RequestError),
    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "workouts", about = "Workout tracker API client")]
struct Cli {
    #[arg(long, env = "WORKOUTS_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Show whether a session token is stored.
    Status,
    List {
        /// Retry transient failures with exponential backoff.
        #[arg(long, default_value_t = false)]
        retry: bool,
    },
    Add(WorkoutArgs),
    Update {
        id: String,
        #[command(flatten)]
        workout: WorkoutArgs,
    },
    /// Set one field; `value` is parsed as JSON, falling back to a string.
    Patch {
        id: String,
        #[arg(long)]
        field: String,
        #[arg(long)]
        value: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct WorkoutArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: String,
    /// Minutes.
    #[arg(long)]
    duration: String,
    #[arg(long)]
    date: Option<String>,
}

impl From<WorkoutArgs> for WorkoutDraft {
    fn from(args: WorkoutArgs) -> Self {
        Self { name: args.name, description: args.description, duration: args.duration, date: args.date }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = match cli.api_url.as_deref() {
        Some(url) => ClientConfig::from_env_with_base_url(url)?,
        None => ClientConfig::from_env()?,
    };
    let store = match &config.session_file {
        Some(path) => FileTokenStore::new(path.clone()),
        None => FileTokenStore::default_location()?,
    };
    let store_path = store.path().to_path_buf();
    let session = Session::restore(Arc::new(store) as Arc<dyn TokenStore>);
    let client = ApiClient::new(config, session.clone()).map_err(RequestError::from)?;

    match cli.command {
        Command::Login { email, password } => {
            AuthApi::new(client).login(&Credentials::new(&email, &password)).await?;
            print_json(&json!({ "authenticated": true }))
        }
        Command::Register { name, email, password } => {
            AuthApi::new(client).register(&Registration { name, email, password }).await?;
            print_json(&json!({ "authenticated": true }))
        }
        Command::Logout => {
            AuthApi::new(client).logout();
            print_json(&json!({ "authenticated": false }))
        }
        Command::Status => print_json(&json!({
            "authenticated": session.is_authenticated(),
            "session_file": store_path.display().to_string(),
        })),
        Command::List { retry } => {
            let api = WorkoutsApi::new(client);
            let mut list = WorkoutList::new();
            if retry {
                let workouts = retry_with_backoff(RetryPolicy::default(), || api.list()).await?;
                list.replace_all(workouts);
            } else {
                api.refresh(&mut list).await?;
            }
            print_json(&json!({
                "workouts": list.as_slice(),
                "count": list.len(),
                "total_minutes": list.total_minutes(),
            }))
        }
        Command::Add(args) => {
            let created = WorkoutsApi::new(client).create(&args.into()).await?;
            print_json(&serde_json::to_value(created)?)
        }
        Command::Update { id, workout } => {
            let updated = WorkoutsApi::new(client).update(&id, &workout.into()).await?;
            print_json(&serde_json::to_value(updated)?)
        }
        Command::Patch { id, field, value } => {
            let value = serde_json::from_str::<Value>(&value).unwrap_or(Value::String(value));
            let data = WorkoutsApi::new(client).patch(&id, &field, value).await?;
            print_json(&data)
        }
        Command::Delete { id } => {
            WorkoutsApi::new(client).delete(&id).await?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
