#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Curve Fit session in the terminal.

mod app;
mod level_transfer;
mod localization;
mod preferences;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use curve_fit_core::{Command, Mode};
use curve_fit_rendering::RenderingBackend;
use curve_fit_rendering_svg::SvgBackend;
use curve_fit_world::{apply, World};

use crate::{
    app::{App, Input, Reply},
    level_transfer::LevelCode,
    preferences::{MemoryPreferenceStore, PreferenceStore, TomlPreferenceStore},
};

/// Command-line arguments for the Curve Fit terminal session.
#[derive(Debug, Parser)]
#[command(name = "curve-fit", about = "Fit a polynomial through random target points")]
struct CliArgs {
    /// Curve family to start with.
    #[arg(long, value_name = "MODE")]
    mode: Option<Mode>,

    /// Seed for target generation; random when omitted.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Writes the current scene to this SVG file after every command.
    #[arg(long, value_name = "PATH")]
    svg: Option<PathBuf>,

    /// TOML file storing theme and language preferences.
    #[arg(long, value_name = "PATH")]
    preferences: Option<PathBuf>,

    /// Starts on the level described by a level code.
    #[arg(long, value_name = "CODE")]
    level: Option<String>,
}

/// Entry point for the Curve Fit command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CliArgs::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("starting session with seed {seed}");

    let mut world = World::with_seed(seed);
    if let Some(mode) = args.mode {
        let mut events = Vec::new();
        apply(&mut world, Command::ChangeMode { mode }, &mut events);
    }

    let backend = match args.svg {
        Some(path) => SvgBackend::new().with_output(path),
        None => SvgBackend::new(),
    };
    let store: Box<dyn PreferenceStore> = match args.preferences {
        Some(path) => {
            let store = TomlPreferenceStore::load(path);
            log::info!("preferences stored at {}", store.path().display());
            Box::new(store)
        }
        None => Box::<MemoryPreferenceStore>::default(),
    };

    let mut app = App::new(world, backend, store)?;
    if let Some(code) = args.level {
        let level = LevelCode::decode(&code).context("invalid --level code")?;
        app.load(level);
    }
    app.present()?;

    run(&mut app, io::stdin().lock(), io::stdout().lock())
}

fn run<B, R, W>(app: &mut App<B>, input: R, mut output: W) -> Result<()>
where
    B: RenderingBackend,
    R: BufRead,
    W: Write,
{
    writeln!(output, "{}", app.describe(&Reply::Summary))?;
    writeln!(output, "{}", app.describe(&Reply::Help))?;
    prompt(&mut output)?;

    for line in input.lines() {
        let line = line.context("failed to read input")?;
        if line.trim().is_empty() {
            prompt(&mut output)?;
            continue;
        }
        match line.parse::<Input>() {
            Ok(input) => {
                let reply = app.execute(input);
                if reply == Reply::Quit {
                    break;
                }
                let text = app.describe(&reply);
                if !text.is_empty() {
                    writeln!(output, "{text}")?;
                }
            }
            Err(error) => writeln!(output, "{error}")?,
        }
        prompt(&mut output)?;
    }
    Ok(())
}

fn prompt(output: &mut impl Write) -> io::Result<()> {
    write!(output, "> ")?;
    output.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_session_reaches_quit() {
        let mut app = App::new(
            World::with_seed(3),
            SvgBackend::new(),
            Box::<MemoryPreferenceStore>::default(),
        )
        .expect("app builds");
        let script = "mode linear\na 1\nbogus\ncheck\nok\nquit\nshow\n";
        let mut output = Vec::new();

        run(&mut app, script.as_bytes(), &mut output).expect("session runs");

        let text = String::from_utf8(output).expect("utf-8 output");
        assert!(text.contains("Linear |"));
        assert!(text.contains("unknown command `bogus`"));
        assert!(text.contains("Great!") || text.contains("Not quite."));
        assert!(text.ends_with("> "));
    }

    #[test]
    fn unwritable_frame_target_keeps_session_running() {
        let target = std::env::temp_dir()
            .join("curve-fit-missing-frames")
            .join("frame.svg");
        let mut app = App::new(
            World::with_seed(3),
            SvgBackend::new().with_output(target),
            Box::<MemoryPreferenceStore>::default(),
        )
        .expect("app builds");
        let mut output = Vec::new();

        run(&mut app, "a 2\nshow\nquit\n".as_bytes(), &mut output).expect("session runs");

        let text = String::from_utf8(output).expect("utf-8 output");
        assert!(text.contains("a = 2.0 |"));
        assert_eq!(text.matches("Targets:").count(), 2);
        assert!(text.ends_with("> "));
    }

    #[test]
    fn arguments_parse_mode_names() {
        let args = CliArgs::try_parse_from(["curve-fit", "--mode", "cubic", "--seed", "9"])
            .expect("arguments parse");
        assert_eq!(args.mode, Some(Mode::Cubic));
        assert_eq!(args.seed, Some(9));
        assert!(CliArgs::try_parse_from(["curve-fit", "--mode", "quartic"]).is_err());
    }
}
