use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "landingkit", version, about)]
pub struct Args {
    /// Path to config.toml (overrides LANDINGKIT_CONFIG and XDG default)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply a page's JSON configuration to a document snapshot
    Apply {
        /// Page URL, including any ?conf= / ?style= query
        #[arg(long)]
        page: String,

        /// Document snapshot (JSON) to mutate
        #[arg(long)]
        dom: PathBuf,

        /// Serve documents from this directory instead of over HTTP
        #[arg(long)]
        root: Option<PathBuf>,

        /// Write the mutated snapshot here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Populate the API selector of a document snapshot from env-config.json
    Envs {
        #[arg(long)]
        page: String,

        #[arg(long)]
        dom: PathBuf,

        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Print a landing page template (configuration + stylesheets) as JSON
    Template {
        #[arg(long)]
        root: PathBuf,

        #[arg(long)]
        name: String,
    },
}
