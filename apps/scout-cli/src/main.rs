use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scout_sphinx::{
    Document, Engine, ScoutError, SearchBuilder, SearchResults, SphinxConfig, SphinxEngine,
    SphinxEngineProvider, connector,
};
use serde_json::{Value, json};
use sphinxql::{Helper, MySqlConnection};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "scout", version)]
#[command(about = "Index and search documents in Sphinx / Manticore", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file to use instead of the project or user config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Named host from the config; the configured default otherwise.
    #[arg(long, global = true)]
    host: Option<String>,

    #[arg(long, global = true)]
    json: bool,

    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the default config file.
    Publish {
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long)]
        force: bool,
    },

    /// Ping the daemon with SHOW STATUS.
    Check,

    /// Replace documents from a JSON-lines file, one object with an `id` per line.
    Index {
        index: String,
        file: PathBuf,
        #[arg(long, default_value_t = 500)]
        batch_size: usize,
    },

    Delete {
        index: String,
        #[arg(required = true)]
        ids: Vec<u64>,
    },

    Search {
        index: String,
        query: String,
        /// Full-text fields to match; all fields when omitted.
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
        #[arg(short, long)]
        limit: Option<u64>,
        #[arg(long)]
        page: Option<u64>,
        #[arg(long, default_value_t = 20)]
        per_page: u64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err
                .downcast_ref::<ScoutError>()
                .map_or(1, ScoutError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = if verbose > 0 { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

async fn run(cli: Cli) -> Result<()> {
    let json_output = cli.json;

    match cli.command {
        Command::Publish { path, force } => {
            let written = SphinxEngineProvider::publish(path.as_deref(), force)?;
            if json_output {
                print_json(json!({ "path": written }))?;
            } else {
                println!("Published {}", written.display());
            }
        }
        Command::Check => {
            let engine = open_engine(cli.config.as_deref(), cli.host.as_deref())?;
            let status = Helper::show_status()
                .execute(engine.connection())
                .await
                .map_err(ScoutError::from)?;
            if json_output {
                print_json(json!({
                    "endpoint": engine.connection().endpoint(),
                    "status": status.rows(),
                }))?;
            } else {
                println!("OK {}", engine.connection().endpoint());
                for row in status.rows() {
                    let name = row.get("Counter").or_else(|| row.get("Variable_name"));
                    if let (Some(name), Some(value)) = (name, row.get("Value")) {
                        println!("{}\t{}", cell(name), cell(value));
                    }
                }
            }
        }
        Command::Index {
            index,
            file,
            batch_size,
        } => {
            let documents = read_documents(&index, &file)?;
            let engine = open_engine(cli.config.as_deref(), cli.host.as_deref())?;
            for batch in documents.chunks(batch_size.max(1)) {
                engine.update(batch).await?;
                tracing::info!(index = %index, documents = batch.len(), "indexed batch");
            }
            if json_output {
                print_json(json!({ "index": index, "indexed": documents.len() }))?;
            } else {
                println!("Indexed {} documents into {index}", documents.len());
            }
        }
        Command::Delete { index, ids } => {
            let engine = open_engine(cli.config.as_deref(), cli.host.as_deref())?;
            let documents: Vec<Document> =
                ids.iter().map(|id| Document::new(index.as_str(), *id)).collect();
            engine.delete(&documents).await?;
            if json_output {
                print_json(json!({ "index": index, "deleted": ids }))?;
            } else {
                println!("Deleted {} documents from {index}", ids.len());
            }
        }
        Command::Search {
            index,
            query,
            fields,
            limit,
            page,
            per_page,
        } => {
            let engine = open_engine(cli.config.as_deref(), cli.host.as_deref())?;
            let mut builder = SearchBuilder::new(Document::template(index.as_str(), fields), query);
            if let Some(limit) = limit {
                builder = builder.with_limit(limit);
            }
            let results = match page {
                Some(page) => engine.paginate(&builder, per_page, page).await?,
                None => engine.search(&builder).await?,
            };
            print_results(&engine, &results, json_output)?;
        }
    }

    Ok(())
}

fn open_engine(
    config_path: Option<&Path>,
    host: Option<&str>,
) -> Result<SphinxEngine<MySqlConnection>> {
    let config = match config_path {
        Some(path) => SphinxConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SphinxConfig::load()?,
    };

    if host.is_none() {
        return Ok(SphinxEngineProvider::new(config).boot()?);
    }

    config.validate()?;
    Ok(SphinxEngine::new(connector::connect_named(&config, host)?))
}

fn read_documents(index: &str, file: &Path) -> Result<Vec<Document>> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut documents = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("{}:{}: invalid JSON", file.display(), lineno + 1))?;
        let document = Document::from_json(index, value)
            .with_context(|| format!("{}:{}", file.display(), lineno + 1))?;
        documents.push(document);
    }
    Ok(documents)
}

fn print_results(
    engine: &SphinxEngine<MySqlConnection>,
    results: &SearchResults,
    json_output: bool,
) -> Result<()> {
    let total = engine.get_total_count(results);
    if json_output {
        return print_json(json!({
            "total": total,
            "ids": engine.map_ids(results),
            "hits": results.stored(),
            "meta": results.meta(),
        }));
    }

    for row in results.stored() {
        let line = row
            .iter()
            .map(|(column, value)| format!("{column}={}", cell(value)))
            .collect::<Vec<_>>()
            .join("\t");
        println!("{line}");
    }
    println!("{} shown, {total} found", results.len());
    Ok(())
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn print_json(value: Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
