//! Command execution implementations

use super::definitions::ConfigCommands;
use super::{Commands, config, dialog};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Inspect {
                source,
                localization,
                json,
            } => dialog::inspect(source, localization.as_deref(), *json),
            Commands::Reencode {
                source,
                destination,
                localization,
            } => dialog::reencode(source, destination, localization.as_deref()),
            Commands::ExportLoca {
                source,
                destination,
                reference,
                modification,
            } => dialog::export_loca(source, destination, reference.as_deref(), *modification),
            Commands::Children { source, uuid } => dialog::children(source, uuid),
            Commands::Config { command } => command.execute(),
        }
    }
}

impl ConfigCommands {
    /// Execute the selected config command.
    ///
    /// # Errors
    /// Returns an error if the config cannot be read or written.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            ConfigCommands::Show => config::show(),
            ConfigCommands::SetLocalization { path } => config::set_localization(path),
            ConfigCommands::ClearLocalization => config::clear_localization(),
        }
    }
}
