use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "docstore", about = "JSON document collections on disk and over HTTP", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the collections under a storage root over HTTP
    Serve(ServeArgs),
    /// List the collections under a storage root
    Collections(CollectionsArgs),
    /// Generate a random session key
    Keygen,
}

/// Flags override the environment, which overrides the config file.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Address to listen on
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Directory holding the collections
    #[arg(long)]
    pub root: Option<PathBuf>,
    /// Maximum request body, e.g. 5M or 512K
    #[arg(long)]
    pub body_limit: Option<String>,
}

#[derive(Args, Debug)]
pub struct CollectionsArgs {
    /// Directory holding the collections
    #[arg(long, default_value = "collections")]
    pub root: PathBuf,
}
