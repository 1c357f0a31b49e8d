//! Code related to the CLI interface for managing the settings file
use crate::settings::{Settings, get_settings_file_path};
use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;

/// Subcommands for settings
#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Edit the program settings file
    Edit,
    /// Get the path to where the settings file is read from
    Path,
    /// Write the contents of a placeholder `settings.toml` to the console
    DumpDefault,
}

impl SettingsSubcommands {
    /// Execute the supplied settings subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::Edit => handle_settings_edit_command()?,
            Self::Path => println!("{}", get_settings_file_path()?.display()),
            Self::DumpDefault => println!("{}", Settings::default_file_contents()),
        }

        Ok(())
    }
}

/// Handle the `settings edit` command.
///
/// If no settings file exists yet, a placeholder is written first so the user
/// has something to edit.
fn handle_settings_edit_command() -> Result<()> {
    let file_path = get_settings_file_path()?;
    if !file_path.is_file() {
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).context("Could not create configuration directory")?;
        }
        fs::write(&file_path, Settings::default_file_contents())
            .context("Could not write placeholder settings file")?;
    }

    edit::edit_file(&file_path).context("Failed to open settings file in an editor")?;

    Ok(())
}
