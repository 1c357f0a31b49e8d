//! Code related to the embedded demo assumption sets and the CLI commands for
//! interacting with them.
use super::{RunOpts, handle_run_command};
use crate::settings::Settings;
use anyhow::{Context, Result, ensure};
use clap::Subcommand;
use include_dir::{Dir, File, include_dir};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The directory containing the embedded demo assumption files.
static DEMOS_DIR: Dir = include_dir!("demos");

/// The available subcommands for managing demo assumption sets.
#[derive(Subcommand)]
pub enum DemoSubcommands {
    /// List available demos.
    List,
    /// Print the assumptions of the specified demo.
    Show {
        /// The name of the demo.
        name: String,
    },
    /// Extract a demo assumptions file to a new location.
    Extract {
        /// The name of the demo to extract.
        name: String,
        /// The destination file for the assumptions.
        new_path: Option<PathBuf>,
    },
    /// Run a demo.
    Run {
        /// The name of the demo to run.
        name: String,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
}

impl DemoSubcommands {
    /// Execute the supplied demo subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::List => handle_demo_list_command(),
            Self::Show { name } => handle_demo_show_command(&name)?,
            Self::Extract { name, new_path } => {
                handle_demo_extract_command(&name, new_path.as_deref())?;
            }
            Self::Run { name, opts } => {
                handle_demo_run_command(&name, opts.output_dir.as_deref(), opts.overwrite, None)?;
            }
        }

        Ok(())
    }
}

/// Find the embedded assumptions file for the named demo
fn get_demo_file(name: &str) -> Result<&'static File<'static>> {
    DEMOS_DIR
        .get_file(format!("{name}.toml"))
        .context("Demo not found.")
}

/// Handle the `demo list` command.
fn handle_demo_list_command() {
    for file in DEMOS_DIR.files() {
        if let Some(name) = file.path().file_stem() {
            println!("{}", name.to_string_lossy());
        }
    }
}

/// Handle the `demo show` command.
fn handle_demo_show_command(name: &str) -> Result<()> {
    let contents = get_demo_file(name)?
        .contents_utf8()
        .expect("Demo file is not UTF-8 encoded");
    println!("{contents}");

    Ok(())
}

/// Handle the `demo extract` command.
fn handle_demo_extract_command(name: &str, dest: Option<&Path>) -> Result<()> {
    let default_path: PathBuf;
    let dest = match dest {
        Some(dest) => dest,
        None => {
            default_path = PathBuf::from(format!("{name}.toml"));
            &default_path
        }
    };

    extract_demo(name, dest)
}

/// Extract the specified demo's assumptions file to a new path
fn extract_demo(name: &str, new_path: &Path) -> Result<()> {
    ensure!(
        !new_path.exists(),
        "Destination {} already exists",
        new_path.display()
    );

    fs::write(new_path, get_demo_file(name)?.contents())?;

    Ok(())
}

/// Handle the `demo run` command.
pub fn handle_demo_run_command(
    name: &str,
    output_path: Option<&Path>,
    overwrite: bool,
    settings: Option<Settings>,
) -> Result<()> {
    let temp_dir = TempDir::new().context("Failed to create temporary directory.")?;
    let assumptions_path = temp_dir.path().join(format!("{name}.toml"));
    extract_demo(name, &assumptions_path)?;

    let opts = RunOpts {
        output_dir: output_path.map(Path::to_path_buf),
        overwrite,
    };
    handle_run_command(&assumptions_path, &opts, settings)
}
