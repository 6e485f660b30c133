use anyhow::{Context as AnyhowContext, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use lookout_classifier::InvestigationClassifier;
use lookout_history::{HistoryConfig, HistoryFilter, HistoryState, SortKey};
use lookout_protocol::{render_contract_schema, serialize_json, HistoryView, InvestigationRecord};
use serde::Serialize;
use serde_json::Value;
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::source::SourceArgs;

mod report;
mod source;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "lookout")]
#[command(about = "Classify, count and list OSINT investigation history", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Emit a JSON envelope on stdout (implies --quiet)
    #[arg(long, global = true)]
    json: bool,

    /// History presentation config (TOML)
    #[arg(long, global = true, env = "LOOKOUT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the investigation type of a query
    Classify(ClassifyArgs),

    /// Print summary counters over the history
    Stats(StatsArgs),

    /// Print the filtered and sorted history list
    List(ListArgs),

    /// Print the JSON Schema of the list/stats output
    Schema,
}

#[derive(Args)]
struct ClassifyArgs {
    /// Query as typed by the user
    query: String,

    /// Result payload of the lookup (JSON); a recognised `type` tag wins
    #[arg(long)]
    payload: Option<String>,
}

#[derive(Args)]
struct LiveArgs {
    /// Append a freshly completed search with this query
    #[arg(long)]
    live: Option<String>,

    /// Result payload of the appended search (JSON)
    #[arg(long, requires = "live")]
    live_payload: Option<String>,
}

#[derive(Args)]
struct StatsArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    live: LiveArgs,
}

#[derive(Args)]
struct ListArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    live: LiveArgs,

    /// Filter tag: all, username, email, phone, ip, name, enhanced_username
    #[arg(long, env = "LOOKOUT_FILTER")]
    filter: Option<String>,

    /// Sort key: recent, oldest, alphabetical, type
    #[arg(long, env = "LOOKOUT_SORT")]
    sort: Option<String>,

    /// Maximum rows to print
    #[arg(long)]
    limit: Option<NonZeroUsize>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum CommandStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize)]
struct CommandResponse {
    status: CommandStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    data: Value,
}

impl CommandResponse {
    fn ok(data: Value) -> Self {
        Self {
            status: CommandStatus::Ok,
            message: None,
            data,
        }
    }

    fn error(err: &anyhow::Error) -> Self {
        Self {
            status: CommandStatus::Error,
            message: Some(format!("{err:#}")),
            data: Value::Null,
        }
    }
}

/// Command output in both renderings.
struct Output {
    text: String,
    data: Value,
    message: Option<String>,
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON parsing
    if cli.json {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match run(&cli).await {
        Ok(output) if cli.json => {
            let response = CommandResponse {
                message: output.message,
                ..CommandResponse::ok(output.data)
            };
            print_stdout(&serialize_json(&response)?)
        }
        Ok(output) => print_stdout(&output.text),
        Err(err) if cli.json => {
            print_stdout(&serialize_json(&CommandResponse::error(&err))?)?;
            std::process::exit(1);
        }
        Err(err) => Err(err),
    }
}

async fn run(cli: &Cli) -> Result<Output> {
    match &cli.command {
        Commands::Classify(args) => run_classify(args),
        Commands::Stats(args) => {
            let state = load_state(cli, &args.source, &args.live).await?;
            stats_output(&state)
        }
        Commands::List(args) => run_list(cli, args).await,
        Commands::Schema => {
            let schema = render_contract_schema()?;
            Ok(Output {
                text: serde_json::to_string_pretty(&schema)?,
                data: schema,
                message: None,
            })
        }
    }
}

fn parse_payload(raw: Option<&str>) -> Result<Value> {
    raw.map_or(Ok(Value::Null), |raw| {
        serde_json::from_str(raw).context("Invalid JSON passed to --payload")
    })
}

/// Classify a single query, optionally with its lookup payload.
fn run_classify(args: &ClassifyArgs) -> Result<Output> {
    let payload = parse_payload(args.payload.as_deref())?;
    let record = InvestigationRecord::from_live(args.query.as_str(), &payload, Utc::now());
    let kind = InvestigationClassifier::classify(&record);
    let rule = if record.payload.tag().is_some() {
        None
    } else {
        InvestigationClassifier::matching_rule(&record.query).map(|rule| rule.name)
    };
    log::debug!("classified '{}' as {kind} (rule: {rule:?})", record.query);

    Ok(Output {
        text: kind.to_string(),
        data: serde_json::json!({
            "query": record.query,
            "type": kind,
            "label": kind.label(),
            "icon": kind.icon(),
            "rule": rule,
        }),
        message: None,
    })
}

async fn run_list(cli: &Cli, args: &ListArgs) -> Result<Output> {
    let mut state = load_state(cli, &args.source, &args.live).await?;
    if let Some(filter) = &args.filter {
        state = state.with_filter(HistoryFilter::parse(filter));
    }
    if let Some(sort) = &args.sort {
        state = state.with_sort(SortKey::parse(sort));
    }
    if let Some(limit) = args.limit {
        state = state.with_max_rows(Some(limit.get()));
    }

    let view = state.view();
    Ok(Output {
        text: report::render_view(&view),
        message: view.message().map(str::to_string),
        data: serde_json::to_value(&view)?,
    })
}

fn stats_output(state: &HistoryState) -> Result<Output> {
    if !state.snapshot().is_available() {
        let view = HistoryView::unavailable();
        return Ok(Output {
            text: report::render_view(&view),
            message: view.message().map(str::to_string),
            data: serde_json::to_value(&view)?,
        });
    }
    let stats = state.stats();
    Ok(Output {
        text: report::render_stats(&stats),
        data: serde_json::to_value(&stats)?,
        message: None,
    })
}

fn load_config(cli: &Cli) -> Result<HistoryConfig> {
    match &cli.config {
        Some(path) => HistoryConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(HistoryConfig::default()),
    }
}

async fn load_state(cli: &Cli, source: &SourceArgs, live: &LiveArgs) -> Result<HistoryState> {
    let config = load_config(cli)?;
    let mut state = HistoryState::new(source.snapshot().await, &config);

    if let Some(query) = &live.live {
        let response = parse_payload(live.live_payload.as_deref())?;
        let record = InvestigationRecord::from_live(query.as_str(), &response, Utc::now());
        log::debug!(
            "appending live {} search '{}'",
            InvestigationClassifier::classify(&record),
            record.query
        );
        state = state.with_record(record);
    }
    Ok(state)
}
