mod display;

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use docketfill_client::{ClientConfig, CourtApiClient, DEFAULT_BASE_URL};
use docketfill_core::{EngineConfig, FanOutPolicy, PageBoundary};
use docketfill_engine::{Engine, EngineError, Operation, Response};
use serde_json::{Map, Value};
use tracing::{Level, info};

#[derive(Parser, Debug)]
#[command(
    name = "docketfill",
    version,
    about = "Fetch claims registers and docket documents, importing from PACER on demand"
)]
struct Cli {
    /// Record service base URL.
    #[arg(long, global = true, env = "DOCKETFILL_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Record service app id.
    #[arg(long, global = true, env = "COURTAPI_APP_ID")]
    app_id: Option<String>,

    /// Record service app secret.
    #[arg(long, global = true, env = "COURTAPI_APP_SECRET", hide_env_values = true)]
    app_secret: Option<String>,

    /// Stop paginating one page early, as older deployments did.
    #[arg(long, global = true)]
    legacy_pagination: bool,

    /// Docket entries processed concurrently during a document search.
    #[arg(long, global = true, default_value_t = 1)]
    max_concurrency: usize,

    /// Abandon the invocation after this many seconds.
    #[arg(long, global = true)]
    deadline_secs: Option<u64>,

    /// Per-request timeout against the record service.
    #[arg(long, global = true, default_value_t = 120)]
    request_timeout_secs: u64,

    /// Output machine-readable JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Log per-page and per-request detail.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct CaseArgs {
    /// PACER court code, e.g. `nysb`.
    #[arg(long)]
    court: String,

    /// Case number as PACER formats it.
    #[arg(long)]
    case_number: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a case's claims register.
    Claims(CaseArgs),

    /// Search a case's dockets and fetch every matching document.
    Documents {
        #[command(flatten)]
        case: CaseArgs,

        /// Docket search filter, repeatable (e.g. `--search searchKeyword=sale`).
        #[arg(long = "search", value_name = "KEY=VALUE", value_parser = parse_search_pair)]
        search: Vec<(String, String)>,
    },

    /// Run an operation against a raw JSON event.
    Invoke {
        /// `claims` or `documents`.
        #[arg(value_parser = parse_operation)]
        operation: Operation,

        /// Event file; read from stdin when omitted.
        #[arg(long)]
        event: Option<PathBuf>,
    },
}

fn parse_search_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

fn parse_operation(s: &str) -> Result<Operation, EngineError> {
    s.parse()
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            page_boundary: if self.legacy_pagination {
                PageBoundary::Exclusive
            } else {
                PageBoundary::Inclusive
            },
            fan_out: FanOutPolicy::bounded(self.max_concurrency),
            ..EngineConfig::default()
        }
    }

    fn client_config(&self) -> ClientConfig {
        ClientConfig::new(
            self.base_url.as_str(),
            self.app_id.clone().unwrap_or_default(),
            self.app_secret.clone().unwrap_or_default(),
        )
        .with_timeout(Duration::from_secs(self.request_timeout_secs))
    }
}

fn case_event(case: &CaseArgs) -> Map<String, Value> {
    let mut event = Map::new();
    event.insert("court".into(), Value::String(case.court.clone()));
    event.insert("caseNumber".into(), Value::String(case.case_number.clone()));
    event
}

fn read_event(path: Option<&PathBuf>) -> Result<Value> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading event file {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading event from stdin")?;
            text
        }
    };
    serde_json::from_str(&text).context("parsing event JSON")
}

/// Run one invocation, abandoning it once `deadline` elapses.
async fn invoke_with_deadline(
    engine: &Engine,
    operation: Operation,
    event: Value,
    deadline: Option<Duration>,
) -> Result<Response, EngineError> {
    let invocation = engine.invoke(operation, event);
    match deadline {
        None => invocation.await,
        Some(limit) => tokio::time::timeout(limit, invocation)
            .await
            .unwrap_or_else(|_| {
                Err(EngineError::Aborted(format!(
                    "deadline of {}s elapsed",
                    limit.as_secs()
                )))
            }),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();
    info!("docketfill v{}", env!("CARGO_PKG_VERSION"));

    let (operation, event) = match &cli.command {
        Commands::Claims(case) => (Operation::Claims, Value::Object(case_event(case))),
        Commands::Documents { case, search } => {
            let mut event = case_event(case);
            let filter: Map<String, Value> = search
                .iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                .collect();
            event.insert("search".into(), Value::Object(filter));
            (Operation::Documents, Value::Object(event))
        }
        Commands::Invoke { operation, event } => (*operation, read_event(event.as_ref())?),
    };

    let client = Arc::new(
        CourtApiClient::new(&cli.client_config()).context("configuring record service client")?,
    );
    let engine = Engine::new(client.clone(), client).with_config(cli.engine_config());

    let deadline = cli.deadline_secs.map(Duration::from_secs);
    let response = match invoke_with_deadline(&engine, operation, event, deadline).await {
        Ok(response) => response,
        Err(err) => {
            if let Some(failure) = err.failure() {
                if let Some(status) = failure.status {
                    eprintln!("  upstream status: {status}");
                }
                if !failure.body.is_empty() {
                    eprintln!("  upstream body:   {}", failure.body);
                }
            }
            return Err(err).context(format!("{operation} invocation failed"));
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }
    match &response {
        Response::Claims(register) => display::print_claims_register(register),
        Response::Documents(documents) => display::print_documents(documents),
    }
    Ok(())
}
