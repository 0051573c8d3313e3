mod app;
mod core;
mod event;
mod event_emitter;
mod platform;
mod subclass;
#[cfg(windows)]
mod win32;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use argh::FromArgs;
use tracing_subscriber::EnvFilter;

use crate::app::{parse_script, App, ScriptCommand};
use crate::core::{Config, WindowHandle, WindowIdentity};
use crate::platform::{DryRunHookService, HookService};
use crate::subclass::{HookFailure, SystemBitness};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shoji - tiling window manager for Windows
#[derive(FromArgs)]
struct Cli {
    /// config file (default: <config dir>/shoji/config.toml)
    #[argh(option)]
    config: Option<PathBuf>,
    #[argh(subcommand)]
    command: Option<SubCommand>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum SubCommand {
    Replay(ReplayCmd),
    CheckConfig(CheckConfigCmd),
    Version(VersionCmd),
}

/// Replay a JSON-lines command script and print the resulting hook calls
#[derive(FromArgs)]
#[argh(subcommand, name = "replay")]
struct ReplayCmd {
    /// script file, one command per line
    #[argh(positional)]
    script: PathBuf,
    /// handle of the window that receives hook notifications
    #[argh(option, default = "0")]
    manager: isize,
    /// bitness of the window manager process: 32 or 64 (default: detected)
    #[argh(option)]
    manager_bits: Option<u32>,
    /// bitness of the operating system: 32 or 64 (default: detected)
    #[argh(option)]
    os_bits: Option<u32>,
    /// hook real windows through the WindowSubclassing libraries (Windows only)
    #[argh(switch)]
    native: bool,
}

/// Validate the configuration file
#[derive(FromArgs)]
#[argh(subcommand, name = "check-config")]
struct CheckConfigCmd {}

/// Show version information
#[derive(FromArgs)]
#[argh(subcommand, name = "version")]
struct VersionCmd {}

fn main() -> Result<()> {
    let cli: Cli = argh::from_env();
    match cli.command {
        None => {
            // No subcommand - show help (simulate --help)
            let args: Vec<&str> = vec!["shoji", "--help"];
            if let Err(e) = Cli::from_args(&args[..1], &args[1..]) {
                println!("{}", e.output);
            }
            Ok(())
        }
        Some(SubCommand::Replay(cmd)) => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_writer(std::io::stderr)
                .init();
            run_replay(cli.config.as_deref(), cmd)
        }
        Some(SubCommand::CheckConfig(_)) => check_config(cli.config.as_deref()),
        Some(SubCommand::Version(_)) => {
            println!("shoji {}", VERSION);
            Ok(())
        }
    }
}

fn parse_bits(name: &str, bits: Option<u32>, detected: bool) -> Result<bool> {
    match bits {
        None => Ok(detected),
        Some(64) => Ok(true),
        Some(32) => Ok(false),
        Some(other) => bail!("{} must be 32 or 64, got {}", name, other),
    }
}

fn resolve_bitness(cmd: &ReplayCmd) -> Result<SystemBitness> {
    let detected = SystemBitness::detect();
    let manager_is_64 = parse_bits("--manager-bits", cmd.manager_bits, detected.manager_is_64)?;
    let os_is_64 = parse_bits("--os-bits", cmd.os_bits, detected.os_is_64 || manager_is_64)?;
    if manager_is_64 && !os_is_64 {
        bail!("a 64-bit window manager can't run on a 32-bit OS");
    }
    Ok(SystemBitness::new(manager_is_64, os_is_64))
}

fn load_script(path: &Path) -> Result<Vec<ScriptCommand>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    let script = parse_script(&content)
        .with_context(|| format!("failed to parse script {}", path.display()))?;
    Ok(script)
}

fn run_replay(config_path: Option<&Path>, cmd: ReplayCmd) -> Result<()> {
    let config = Config::load(config_path).context("failed to load config")?;
    let script = load_script(&cmd.script)?;
    let bitness = resolve_bitness(&cmd)?;
    let manager = WindowHandle(cmd.manager);
    tracing::info!(
        "Replaying {} command(s), manager {}, {:?}",
        script.len(),
        manager,
        bitness
    );

    if cmd.native {
        return replay_native(&config, &script, bitness, manager);
    }

    let mut app = App::new(&config, DryRunHookService::new(), bitness, manager)?;
    let summary = app.replay(&script, |step, app, failures| {
        println!("{:>4}: {:?}", step.line, step.command);
        for call in app.coordinator().platform().take_calls() {
            println!("      {}", call);
        }
        print_failures(failures);
    });

    print_report(&app);
    let failures = app.shutdown();
    let calls = app.coordinator().platform().take_calls();
    if !calls.is_empty() {
        println!("shutdown:");
        for call in calls {
            println!("      {}", call);
        }
    }
    print_failures(&failures);
    print_summary(&app, summary.commands, summary.failures + failures.len());
    Ok(())
}

#[cfg(windows)]
fn replay_native(
    config: &Config,
    script: &[ScriptCommand],
    bitness: SystemBitness,
    manager: WindowHandle,
) -> Result<()> {
    let platform = win32::NativeHookService::new(bitness.manager_is_64);
    let mut app = App::new(config, platform, bitness, manager)?;
    let summary = app.replay(script, |step, _, failures| {
        println!("{:>4}: {:?}", step.line, step.command);
        print_failures(failures);
    });
    print_report(&app);
    let failures = app.shutdown();
    print_failures(&failures);
    print_summary(&app, summary.commands, summary.failures + failures.len());
    Ok(())
}

#[cfg(not(windows))]
fn replay_native(
    _config: &Config,
    _script: &[ScriptCommand],
    _bitness: SystemBitness,
    _manager: WindowHandle,
) -> Result<()> {
    bail!("--native is only available on Windows");
}

fn print_failures(failures: &[HookFailure]) {
    for f in failures {
        println!("      ! {} {} failed: {}", f.op, f.window, f.error);
    }
}

/// Workspace contents and subclass state before shutdown.
fn print_report<P: HookService>(app: &App<P>) {
    let state = app.state();
    let coordinator = app.coordinator();
    for ws in &state.workspaces {
        let windows: Vec<String> = ws.windows.iter().map(|h| h.to_string()).collect();
        println!(
            "workspace {}{} [{}]{}: {}",
            ws.id,
            ws.name.as_ref().map_or(String::new(), |n| format!(" ({})", n)),
            ws.layout,
            if ws.is_current { " *" } else { "" },
            windows.join(" ")
        );
    }

    let mut windows: Vec<&WindowIdentity> = state.windows.values().collect();
    windows.sort_by_key(|w| w.handle);
    for window in windows {
        if !coordinator.is_subclassed(window) {
            println!("window {} ({}): not subclassed", window.handle, window.class_name);
            continue;
        }
        let occurrences: Vec<String> = state
            .workspaces
            .iter()
            .filter_map(|ws| {
                let count = coordinator.occurrence_count(ws.id, window);
                (count > 0).then(|| format!("{}x{}", ws.id, count))
            })
            .collect();
        println!(
            "window {} ({}): subclassed, workspaces {}",
            window.handle,
            window.class_name,
            occurrences.join(", ")
        );
    }
}

fn print_summary<P: HookService>(app: &App<P>, commands: usize, failures: usize) {
    let state = app.state();
    println!(
        "{} command(s), {} window(s), {} subclassed, current workspace {}, {} hook failure(s)",
        commands,
        state.windows.len(),
        app.coordinator().subclassed_count(),
        state.current_workspace_id(),
        failures
    );
}

fn check_config(path: Option<&Path>) -> Result<()> {
    let config = Config::load(path).context("invalid config")?;
    let shown = path.map_or_else(Config::default_path, Path::to_path_buf);
    println!("Config: {}", shown.display());
    println!("Starting workspace: {}", config.starting_workspace);
    for (i, ws) in config.workspaces.iter().enumerate() {
        match &ws.name {
            Some(name) => println!("Workspace {} ({}): {}", i + 1, name, ws.layout),
            None => println!("Workspace {}: {}", i + 1, ws.layout),
        }
    }
    println!(
        "Subclassing ignore rules: {}",
        config.subclassing.ignore.len()
    );
    Ok(())
}
