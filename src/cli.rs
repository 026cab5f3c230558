use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sitedrop")]
#[command(author, version, about = "Telegram bot that deploys zip archives and HTML files as static sites", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the webhook and static file server (default)
    Serve,

    /// Register the webhook URL and command menu with Telegram
    SetWebhook,

    /// Deploy a local zip or HTML file without going through Telegram
    Deploy {
        /// File to deploy
        file: PathBuf,

        /// Media type to classify the file with (e.g. application/zip)
        #[arg(long)]
        mime: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
