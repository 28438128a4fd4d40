// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gangway")]
#[command(about = "Deployment agent that turns blueprints into services through an adapter")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the config file (defaults to discovery in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new gangway.yml configuration file
    Init {
        /// Adapter endpoint to write into the config
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Run the deployment API
    Serve {
        /// Address to listen on, overriding the config
        #[arg(short, long)]
        listen: Option<SocketAddr>,
    },
}
