use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cadence_api::ServerConfig;
use cadence_model::{Schedule, WorkflowInstance};
use cadence_status::{
  AllowAllAuthorizer, PolicyAuthorizer, ServiceAccountUsageAuthorizer, StatusService,
};
use cadence_store::SqliteStorage;

const DATABASE_FILE: &str = "cadence.db";

/// Cadence - run-state and event queries for scheduled workflows
#[derive(Parser)]
#[command(name = "cadence")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the data directory (default: ~/.cadence)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Log output format
  #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
  log_format: LogFormat,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
  Pretty,
  Json,
}

#[derive(Subcommand)]
enum Commands {
  /// Serve the status API over HTTP
  Serve {
    /// Address to listen on
    #[arg(long, env = "CADENCE_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// JSON policy of service-account usage grants (default: allow all)
    #[arg(long, env = "CADENCE_POLICY_FILE")]
    policy_file: Option<PathBuf>,
  },

  /// Normalize a schedule alias such as "daily" or "HOURS"
  Schedule { token: String },

  /// Query run-states and events from the local database
  Status {
    #[command(subcommand)]
    query: StatusQuery,
  },
}

#[derive(Subcommand)]
enum StatusQuery {
  /// List active run-states
  Active {
    /// Only list instances of this component
    #[arg(long)]
    component: Option<String>,
  },

  /// List the events of one workflow instance
  Events {
    /// Instance key, e.g. "my-component#my-workflow#2024-03-01"
    key: String,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.log_format);

  let data_dir = match cli.data_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".cadence"),
  };

  match cli.command {
    Some(Commands::Serve { bind, policy_file }) => {
      let rt = tokio::runtime::Runtime::new()?;
      rt.block_on(serve(data_dir, bind, policy_file))?;
    }
    Some(Commands::Schedule { token }) => {
      print_schedule(&token)?;
    }
    Some(Commands::Status { query }) => {
      let rt = tokio::runtime::Runtime::new()?;
      rt.block_on(run_status_query(data_dir, query))?;
    }
    None => {
      println!("cadence - use --help to see available commands");
    }
  }

  Ok(())
}

fn init_logging(format: LogFormat) {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let registry = tracing_subscriber::registry().with(env_filter);

  // Logs go to stderr so query output on stdout stays machine-readable.
  match format {
    LogFormat::Pretty => registry
      .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
      .init(),
    LogFormat::Json => registry
      .with(
        tracing_subscriber::fmt::layer()
          .json()
          .with_writer(std::io::stderr),
      )
      .init(),
  }
}

async fn open_storage(data_dir: &Path) -> Result<SqliteStorage> {
  tokio::fs::create_dir_all(data_dir)
    .await
    .with_context(|| format!("failed to create data directory: {}", data_dir.display()))?;

  let path = data_dir.join(DATABASE_FILE);
  SqliteStorage::open(&path)
    .await
    .with_context(|| format!("failed to open database: {}", path.display()))
}

async fn serve(data_dir: PathBuf, bind: SocketAddr, policy_file: Option<PathBuf>) -> Result<()> {
  let storage = open_storage(&data_dir).await?;

  let authorizer: Arc<dyn ServiceAccountUsageAuthorizer> = match policy_file {
    Some(path) => {
      let authorizer = PolicyAuthorizer::from_file(&path)
        .await
        .with_context(|| format!("failed to load policy file: {}", path.display()))?;
      tracing::info!(path = %path.display(), "using policy authorizer");
      Arc::new(authorizer)
    }
    None => {
      tracing::warn!("no policy file configured; service account usage is not checked");
      Arc::new(AllowAllAuthorizer)
    }
  };

  let service = StatusService::new(Arc::new(storage), authorizer);

  let cancel = CancellationToken::new();
  let shutdown = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      tracing::info!("shutdown requested");
    }
    shutdown.cancel();
  });

  cadence_api::serve(ServerConfig { bind }, service, cancel)
    .await
    .context("status api failed")
}

fn print_schedule(token: &str) -> Result<()> {
  let schedule = Schedule::parse(token)?;
  let output = serde_json::json!({
    "name": schedule.to_string(),
    "expression": schedule.expression(),
    "json": schedule.to_json(),
  });
  println!("{}", serde_json::to_string_pretty(&output)?);
  Ok(())
}

async fn run_status_query(data_dir: PathBuf, query: StatusQuery) -> Result<()> {
  let storage = open_storage(&data_dir).await?;
  let service = StatusService::new(Arc::new(storage), Arc::new(AllowAllAuthorizer));

  let output = match query {
    StatusQuery::Active { component } => {
      let payload = service
        .active_states(component.as_deref())
        .await
        .context("failed to list active states")?;
      serde_json::to_string_pretty(&payload)?
    }
    StatusQuery::Events { key } => {
      let instance = WorkflowInstance::parse_key(&key)?;
      let payload = service
        .events_for_workflow_instance(
          instance.component_id(),
          &instance.workflow_id.id,
          &instance.instance_id,
        )
        .await
        .context("failed to list events")?;
      serde_json::to_string_pretty(&payload)?
    }
  };

  println!("{}", output);
  Ok(())
}
