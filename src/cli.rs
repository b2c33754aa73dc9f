use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rkdist", version, about = "Artifact distribution daemon CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the distribution daemon with config file
    Start {
        #[arg(short, long)]
        config: PathBuf,
    },
}
