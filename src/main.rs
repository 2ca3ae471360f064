use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use sesh::config::ConfigStore;
use sesh::{logging, paths, picker, tmux};

#[derive(Parser)]
#[command(name = "sesh")]
#[command(about = "Open project directories as tmux sessions")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Project directory to open directly (skips the picker). Subcommand
    /// names win, so open a directory named `list` as `./list`
    path: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a directory to the search paths
    Add { path: String },
    /// Remove a directory from the search paths
    Remove { path: String },
    /// List the search paths
    List,
    /// Show the editor command, or set it
    Editor { command: Option<String> },
}

fn main() -> ExitCode {
    logging::init_tracing();
    let cli = Cli::parse();
    let mut store = ConfigStore::new();

    match run(cli, &mut store) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, store: &mut ConfigStore) -> Result<ExitCode> {
    match cli.command {
        Some(command) => run_command(command, store),
        None => open_project(cli.path, store),
    }
}

fn run_command(command: Commands, store: &mut ConfigStore) -> Result<ExitCode> {
    match command {
        Commands::Add { path } => {
            if !paths::is_valid_dir(&path, store.home()) {
                eprintln!("Invalid path: {}", path);
                return Ok(ExitCode::FAILURE);
            }
            store.add_search_path(&path).context("Failed to add path")?;
            println!("Path added: {}", path);
        }
        Commands::Remove { path } => {
            store
                .remove_search_path(&path)
                .context("Failed to remove path")?;
            println!("Path removed: {}", path);
        }
        Commands::List => {
            for path in store.search_paths()? {
                println!("{}", path);
            }
        }
        Commands::Editor { command: None } => {
            println!("{}", store.editor_command()?);
        }
        Commands::Editor {
            command: Some(command),
        } => {
            store.set_editor_command(&command)?;
            println!("Editor set: {}", command);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// `sesh PATH` opens PATH directly; bare `sesh` runs the picker.
fn open_project(path: Option<String>, store: &mut ConfigStore) -> Result<ExitCode> {
    let project = match path {
        Some(path) => {
            if !paths::is_valid_dir(&path, store.home()) {
                eprintln!("Unknown command. Run `sesh help` for usage.");
                return Ok(ExitCode::FAILURE);
            }
            paths::resolve(&path, store.home())?
        }
        None => {
            let search_paths = store.search_paths().context("failed to load paths")?;
            match picker::select_project(&search_paths)? {
                Some(project) => project,
                None => return Ok(ExitCode::SUCCESS),
            }
        }
    };

    open_session(store, &project)?;
    Ok(ExitCode::SUCCESS)
}

fn open_session(store: &mut ConfigStore, project: &Path) -> Result<()> {
    let editor = store.editor_command().context("failed to get editor")?;
    tmux::launch(project, &editor)
        .with_context(|| format!("Failed to launch session for {}", project.display()))
}
