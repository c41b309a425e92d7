use anyhow::Context;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use colored::Colorize;

use docstore_server::{parse_size, DocstoreServer, ServerConfig};
use docstore_session::SessionCodec;
use docstore_store::Storage;

use crate::cli::{Cli, CollectionsArgs, Command, OutputFormat, ServeArgs};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Collections(args) => cmd_collections(args, cli.format),
        Command::Keygen => cmd_keygen(cli.format),
    }
}

/// Layer config file, environment (via `lookup`) and flags, in that order.
pub fn resolve_config(args: &ServeArgs, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<ServerConfig> {
    let base = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    let mut config = base.with_env_from(lookup)?;

    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(root) = &args.root {
        config.storage_root = root.clone();
    }
    if let Some(limit) = &args.body_limit {
        config.max_body_size = parse_size(limit).with_context(|| format!("invalid --body-limit {limit:?}"))?;
    }
    Ok(config)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args, |key| std::env::var(key).ok())?;
    tracing::debug!(?config, "resolved server configuration");
    println!(
        "{} docstore on {} (root: {}, body limit: {} bytes)",
        "▶".green().bold(),
        config.bind_addr.to_string().bold(),
        config.storage_root.display(),
        config.max_body_size
    );

    let runtime = tokio::runtime::Runtime::new().context("failed to start the async runtime")?;
    runtime.block_on(DocstoreServer::new(config).serve())?;
    Ok(())
}

fn cmd_collections(args: CollectionsArgs, format: OutputFormat) -> anyhow::Result<()> {
    let infos = Storage::open(&args.root).list_collections()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&infos)?),
        OutputFormat::Text if infos.is_empty() => {
            println!("No collections under {}.", args.root.display());
        }
        OutputFormat::Text => {
            for info in &infos {
                println!("{:<32} {} entries", info.name.bold(), info.entries.to_string().cyan());
            }
        }
    }
    Ok(())
}

fn cmd_keygen(format: OutputFormat) -> anyhow::Result<()> {
    let key = STANDARD.encode(SessionCodec::generate_key());
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "key": key })),
        OutputFormat::Text => println!("{key}"),
    }
    Ok(())
}
