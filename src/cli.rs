use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pokedex-api")]
#[command(about = "A pokedex CRUD service backed by DynamoDB")]
#[command(
    long_about = "HTTP CRUD service for pokedex records with a pluggable storage layer. \
                  DynamoDB is the supported backend; selecting anything else fails at startup."
)]
#[command(version)]
pub struct Cli {
    /// Server host to bind to
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Server port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Storage backend selector (currently only "dynamodb")
    #[arg(short, long)]
    pub backend: Option<String>,

    /// DynamoDB table name (required for the dynamodb backend)
    #[arg(short, long)]
    pub table: Option<String>,

    /// AWS region (optional, uses default AWS config if not specified)
    #[arg(long)]
    pub aws_region: Option<String>,

    /// Configuration file path (JSON format)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Default tracing filter for the chosen verbosity flags.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "trace"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
