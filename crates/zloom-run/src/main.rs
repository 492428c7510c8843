/*
 * Copyright (c) Peter Bjorklund. All rights reserved. https://github.com/zloom/zloom
 * Licensed under the MIT License. See LICENSE in the project root for license information.
 */
use pico_args::Arguments;
use std::ffi::OsString;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::{fs, io};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};
use zloom_vm::prelude::{DispatchTables, Environment, StepConfig, Stepper};

pub fn init_logger(debug: bool) {
    let level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    fmt()
        .with_env_filter(filter)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage<W: Write>(mut out: W) {
    let _ = write!(
        out,
        "\
Usage: zloom-run [OPTIONS] <story-file>\n\n\
Options:\n\
  -d, --debug             (trace every decoded instruction)\n\
  --max-steps <n>         (stop after this many instructions)\n\
  -h, --help              (print this help and exit)\n"
    );
}

fn single_path(leftover: Vec<OsString>) -> Option<PathBuf> {
    match <[OsString; 1]>::try_from(leftover) {
        Ok([path]) => Some(PathBuf::from(path)),
        Err(_) => None,
    }
}

fn main() -> ExitCode {
    let mut args = Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print_usage(io::stdout());
        return ExitCode::from(1);
    }

    let debug = args.contains(["-d", "--debug"]);

    let max_steps: Option<usize> = match args.opt_value_from_str("--max-steps") {
        Ok(steps) => steps,
        Err(e) => {
            eprintln!("error: invalid value for `--max-steps`: {e}\n");
            print_usage(io::stderr());
            return ExitCode::from(1);
        }
    };

    // Exactly one positional argument: the story file
    let Some(path) = single_path(args.finish()) else {
        print_usage(io::stderr());
        return ExitCode::from(1);
    };

    init_logger(debug);

    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("error: could not read {}: {e}", path.display());
            return ExitCode::from(1);
        }
    };

    let image = match zloom_blorb::unwrap_story(&bytes) {
        Ok(image) => image.to_vec(),
        Err(e) => {
            eprintln!("error: {}: {e}", path.display());
            return ExitCode::from(1);
        }
    };

    let mut env = match Environment::new(image) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(1);
        }
    };

    let tables = DispatchTables::for_version(env.version());
    let config = StepConfig {
        trace_steps: debug,
        trace_color: io::stderr().is_terminal(),
    };
    let stepper = Stepper::new(&tables, config);

    let result = match max_steps {
        Some(max_steps) => stepper.run_for(&mut env, max_steps).map(|executed| {
            info!(executed, max_steps, "run stopped");
        }),
        None => stepper.run(&mut env),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e} (pc {:#06X})", env.pc());
            ExitCode::from(1)
        }
    }
}
