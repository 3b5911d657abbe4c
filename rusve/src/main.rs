//! # Rusve CLI Entry Point
//!
//! 1. **Initialization**: installs logging and parses arguments with [`cli::Cli`].
//! 2. **Bootstrap**: schema commands only parse the descriptor set; `call` builds the
//!    full [`AppContext`] with one handle per service.
//! 3. **Presentation**: results and errors are rendered through [`formatter`].

mod cli;
mod formatter;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use cli::{Cli, Commands, ConnectionArgs, SchemaCommands};
use formatter::{FormattedString, ServiceList, WrittenFiles};
use rusve_core::{AppContext, DynamicRequest, DynamicResponse, SchemaBundle, ServiceKind};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Cli::parse();

    if let Err(err) = run(args).await {
        eprintln!("{}", FormattedString::from(err));
        process::exit(1);
    }
}

async fn run(args: Cli) -> Result<()> {
    match args.command {
        Commands::Services => list_services(&args.connection),
        Commands::Describe { symbol } => describe(&args.connection, &symbol),
        Commands::Call {
            endpoint,
            body,
            headers,
        } => {
            let (service, method) = endpoint;
            call(&args.connection, &service, method, body, headers).await
        }
        Commands::Schemas {
            sub: SchemaCommands::Export { dir },
        } => export_schemas(&dir),
    }
}

fn load_bundle(connection: &ConnectionArgs) -> Result<SchemaBundle> {
    match &connection.descriptor_set {
        Some(path) => Ok(SchemaBundle::from_descriptor_file(path)?),
        None => Ok(SchemaBundle::embedded()),
    }
}

fn list_services(connection: &ConnectionArgs) -> Result<()> {
    let descriptors = load_bundle(connection)?.parse()?;
    println!(
        "{}",
        FormattedString::from(ServiceList(descriptors.list_services()))
    );
    Ok(())
}

fn describe(connection: &ConnectionArgs, symbol: &str) -> Result<()> {
    let descriptors = load_bundle(connection)?.parse()?;
    let descriptor = descriptors
        .get_descriptor_by_symbol(symbol)
        .ok_or_else(|| anyhow!("Symbol '{symbol}' not found"))?;

    println!("{}", FormattedString::from(descriptor));
    Ok(())
}

async fn call(
    connection: &ConnectionArgs,
    service: &str,
    method: String,
    body: serde_json::Value,
    headers: Vec<(String, String)>,
) -> Result<()> {
    let kind = ServiceKind::from_name(service)
        .ok_or_else(|| anyhow!("Unknown service '{service}'"))?;

    let config = connection.client_config()?;
    let ctx = AppContext::bootstrap(&config).context("Failed to initialize clients")?;

    let response = ctx
        .client(kind)
        .dynamic(DynamicRequest {
            method,
            body,
            headers,
        })
        .await?;

    match response {
        DynamicResponse::Unary(Ok(value)) => println!("{}", FormattedString::from(value)),
        DynamicResponse::Unary(Err(status)) => println!("{}", FormattedString::from(status)),
        DynamicResponse::Streaming(Ok(values)) => print_stream(values),
        DynamicResponse::Streaming(Err(status)) => {
            println!("{}", FormattedString::from(status))
        }
    }
    Ok(())
}

fn print_stream(stream: Vec<Result<serde_json::Value, rusve_core::tonic::Status>>) {
    for elem in stream {
        match elem {
            Ok(val) => println!("{}", FormattedString::from(val)),
            Err(status) => println!("{}", FormattedString::from(status)),
        }
    }
}

fn export_schemas(dir: &Path) -> Result<()> {
    let paths: Vec<PathBuf> = SchemaBundle::embedded().materialize(dir)?;
    println!("{}", FormattedString::from(WrittenFiles(paths)));
    Ok(())
}
