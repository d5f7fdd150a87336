use clap::Subcommand;
use std::path::PathBuf;

pub mod config;
pub mod definitions;
pub mod dialog;
mod execute;

pub use definitions::ConfigCommands;

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a dialog and print a summary
    Inspect {
        /// Dialog LSX file
        source: PathBuf,

        /// Localization XML used to resolve node text
        #[arg(short, long)]
        localization: Option<PathBuf>,

        /// Print the decoded dialog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode a dialog and encode it again
    Reencode {
        /// Source dialog LSX file
        source: PathBuf,

        /// Output LSX file
        destination: PathBuf,

        /// Localization XML used to resolve node text
        #[arg(short, long)]
        localization: Option<PathBuf>,
    },

    /// Export the text handles a dialog introduces
    #[command(name = "export-loca")]
    ExportLoca {
        /// Dialog LSX file
        source: PathBuf,

        /// Output localization XML
        destination: PathBuf,

        /// Existing localization XML to compare against
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// Only export handles missing from the reference
        #[arg(short, long)]
        modification: bool,
    },

    /// List the children of a node, looking through reroutes
    Children {
        /// Dialog LSX file
        source: PathBuf,

        /// Node UUID
        uuid: String,
    },

    /// Show or change the persisted configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}
