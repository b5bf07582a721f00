//! `odata` command-line tool.
//!
//! Exercises the request builder and the response normaliser without a live
//! service: print the URL or request options the adapter would send, or
//! normalise a response body captured from the service.
//!
//! ```text
//! odata --config adapter.toml url --model person --id 1
//! odata query --model person --params '{"$top": 5}'
//! odata options --url /people(1) --verb PUT --data '{"Name": "x"}'
//! odata normalize --schemas schemas.json --model post --request-type findAll < response.json
//! ```
//!
//! Logs go to stderr. `RUST_LOG` takes precedence over `--log-level`.

mod commands;

use std::io::Read;
use std::path::{Path, PathBuf};

use adapter::{AdapterConfig, RequestBuilder};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dialect::{HttpVerb, ModelName, RecordId, RequestType, SchemaRegistry};
use serde_json::Value;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::commands::{parse_record_id, parse_request_type};

#[derive(Parser, Debug)]
#[command(name = "odata")]
#[command(about = "Build request URLs and normalise responses for the OData web-service dialect")]
#[command(version)]
struct Args {
    /// Adapter configuration file (TOML).
    #[arg(long, global = true, env = "ODATA_CONFIG")]
    config: Option<PathBuf>,

    /// Default log level when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the URL for a model and optional record identifier.
    Url {
        #[arg(long)]
        model: ModelName,

        #[arg(long, value_parser = parse_record_id)]
        id: Option<RecordId>,

        /// Select the URL form for a store operation, e.g. `createRecord`.
        #[arg(long, value_parser = parse_request_type)]
        request_type: Option<RequestType>,
    },

    /// Print the request options for a query.
    Query {
        #[arg(long)]
        model: ModelName,

        /// Query parameters as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Serialise parameters in alphabetical key order.
        #[arg(long)]
        sorted: bool,
    },

    /// Print the request options for a URL and verb.
    Options {
        #[arg(long)]
        url: String,

        #[arg(long, default_value = "GET")]
        verb: HttpVerb,

        /// Request payload as JSON.
        #[arg(long)]
        data: Option<String>,
    },

    /// Normalise a response body read from a file or stdin.
    Normalize {
        /// Schema registry file (JSON object keyed by model name).
        #[arg(long)]
        schemas: PathBuf,

        #[arg(long)]
        model: ModelName,

        #[arg(long, value_parser = parse_request_type)]
        request_type: RequestType,

        #[arg(long, value_parser = parse_record_id)]
        id: Option<RecordId>,

        /// Response body file; `-` or omitted reads stdin.
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level, args.log_format)?;

    let config = match &args.config {
        Some(path) => AdapterConfig::load(path)?,
        None => AdapterConfig::default(),
    };
    tracing::debug!(host = ?config.host(), "adapter configured");
    let builder = RequestBuilder::new(config);

    match args.command {
        Command::Url {
            model,
            id,
            request_type,
        } => {
            println!("{}", commands::url(&builder, &model, id.as_ref(), request_type));
        }
        Command::Query {
            model,
            params,
            sorted,
        } => {
            let params = parse_json(&params, "--params")?;
            print_json(&commands::query(&builder, &model, params, sorted)?)?;
        }
        Command::Options { url, verb, data } => {
            let data = data.map(|d| parse_json(&d, "--data")).transpose()?;
            print_json(&commands::options(&builder, url, verb, data)?)?;
        }
        Command::Normalize {
            schemas,
            model,
            request_type,
            id,
            input,
        } => {
            let registry: SchemaRegistry = serde_json::from_str(&read_file(&schemas)?)
                .with_context(|| format!("Malformed schema registry '{}'", schemas.display()))?;
            let body = match input.as_deref() {
                Some(path) if path != Path::new("-") => read_file(path)?,
                _ => read_stdin()?,
            };
            let payload = parse_json(&body, "response body")?;
            print_json(&commands::normalize(
                registry,
                &model,
                request_type,
                id.as_ref(),
                payload,
            )?)?;
        }
    }

    Ok(())
}

fn init_tracing(level: &str, format: LogFormat) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).with_context(|| format!("Invalid log level '{level}'"))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr).with_target(false))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
    Ok(())
}

fn parse_json(text: &str, what: &str) -> Result<Value> {
    serde_json::from_str(text).with_context(|| format!("{what} is not valid JSON"))
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to render JSON")?);
    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))
}

fn read_stdin() -> Result<String> {
    let mut body = String::new();
    std::io::stdin()
        .read_to_string(&mut body)
        .context("Failed to read response body from stdin")?;
    Ok(body)
}
