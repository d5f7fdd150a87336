//! Subcommand enum definitions for CLI

use clap::Subcommand;
use std::path::PathBuf;

/// Configuration commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the config file location and contents
    Show,

    /// Set the reference localization XML
    SetLocalization {
        /// Localization XML path (`~` is expanded when used)
        path: PathBuf,
    },

    /// Forget the reference localization XML
    ClearLocalization,
}
