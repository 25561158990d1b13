//! Command line entry point.

use clap::Parser;
use collabcanvas_app::{Script, ScriptError, Session};
use collabcanvas_core::{InteractionConfig, ShortcutRegistry};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "collabcanvas", about = "Replay a canvas interaction script")]
struct Cli {
    /// Session script (JSON).
    script: Option<PathBuf>,

    /// Interaction config (JSON), overriding the script's own.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the keyboard shortcut table and exit.
    #[arg(long)]
    shortcuts: bool,

    /// Print the summary on a single line.
    #[arg(long)]
    compact: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if cli.shortcuts {
        println!("\n=== Keyboard Shortcuts ===");
        print!("{}", ShortcutRegistry::table());
        println!();
        return ExitCode::SUCCESS;
    }

    let Some(path) = cli.script.as_deref() else {
        eprintln!("No script given. Pass a script path or --shortcuts.");
        return ExitCode::FAILURE;
    };

    match run(path, cli.config.as_deref(), cli.compact) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Session failed: {}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &Path, config: Option<&Path>, compact: bool) -> Result<(), ScriptError> {
    log::info!("Starting CollabCanvas session");
    let mut script = Script::load(path)?;
    if let Some(config) = config {
        script.config = InteractionConfig::load(config)?;
    }

    let summary = Session::new(&script).run(&script);
    let json = if compact {
        serde_json::to_string(&summary)?
    } else {
        serde_json::to_string_pretty(&summary)?
    };
    println!("{json}");
    Ok(())
}
