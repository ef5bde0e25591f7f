//! SloMo headless driver.
//!
//! Replays a script of host events against a memory image, with the plugin
//! attached exactly as an emulator would attach it, and leaves the captured
//! frames on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use emu_core::{FlatMemory, Observable};
use slomo::script::load_script;
use slomo::{Replay, SloMo, SloMoConfig, SloMoError, load_sna};

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

struct CliArgs {
    config_path: Option<PathBuf>,
    sna_path: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    script_path: Option<PathBuf>,
    verbose: bool,
}

fn usage() {
    eprintln!("Usage: slomo [OPTIONS] <script.json>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <file>   JSON plugin config");
    eprintln!("  --sna <file>      Load guest RAM from a SNA snapshot");
    eprintln!("  --out <dir>       Frame output directory (created if missing)");
    eprintln!("  --verbose, -v     Debug logging (RUST_LOG overrides)");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        sna_path: None,
        out_dir: None,
        script_path: None,
        verbose: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                cli.config_path = args.get(i).map(PathBuf::from);
            }
            "--sna" => {
                i += 1;
                cli.sna_path = args.get(i).map(PathBuf::from);
            }
            "--out" => {
                i += 1;
                cli.out_dir = args.get(i).map(PathBuf::from);
            }
            "--verbose" | "-v" => {
                cli.verbose = true;
            }
            "--help" | "-h" => {
                usage();
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown argument: {other}");
                process::exit(1);
            }
            other => {
                cli.script_path = Some(PathBuf::from(other));
            }
        }
        i += 1;
    }

    cli
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

fn run(cli: &CliArgs, script_path: &Path) -> slomo::Result<()> {
    let mut config = match cli.config_path {
        Some(ref path) => SloMoConfig::load(path)?,
        None => SloMoConfig::default(),
    };
    if let Some(ref dir) = cli.out_dir {
        config.output_dir.clone_from(dir);
        config.create_output_dir = true;
    }

    let mut memory = FlatMemory::new();
    if let Some(ref path) = cli.sna_path {
        let data = fs::read(path).map_err(|source| SloMoError::Io {
            path: path.clone(),
            source,
        })?;
        load_sna(&mut memory, &data)?;
        log::info!("Loaded snapshot {}", path.display());
    }

    let events = load_script(script_path)?;
    let mut replay = Replay::new(SloMo::new(config), memory);
    let stats = replay.run(&events)?;

    let (plugin, _memory) = replay.finish();
    let engine = plugin.engine();
    log::info!(
        "{} events: {} screen writes, {} hotkeys, {} hsync reads",
        stats.events,
        stats.writes_forwarded,
        stats.keys_handled,
        stats.reads_answered
    );
    if let (Some(mode), Some(frame)) = (engine.query("mode"), engine.query("frame")) {
        log::info!("Final mode {mode}, next frame {frame}");
    }
    eprintln!(
        "Wrote {} frames to {}",
        engine.writer().frames_written(),
        engine.output_dir().display()
    );
    Ok(())
}

fn main() {
    let cli = parse_args();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();

    let Some(ref script_path) = cli.script_path else {
        usage();
        process::exit(1);
    };

    if let Err(e) = run(&cli, script_path) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
