//! huffpack: command-line front end for the huffpack compressor.
//!
//! Exit status is 0 on success and 1 on any failure. A failed run never
//! leaves a partially written output file behind.

mod config;
mod input_gen;

use std::path::Path;
use std::process::ExitCode;

use huffpack_core::metrics::{Metrics, Operation};
use huffpack_core::{decode, encode, ByteStream, FileStream, Result};
use log::{error, info, warn};

use config::{Command, Config, STDIN_PATH};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("huffpack: {}", e);
            eprintln!("run `huffpack --help` for usage");
            return ExitCode::FAILURE;
        }
    };

    init_logging(config.verbosity);

    if config.print_config {
        config.print();
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?} failed: {}", config.command, e);
            eprintln!("huffpack: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Route `log` output to stderr; `RUST_LOG` overrides the verbosity flags.
fn init_logging(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn open_input(path: &Path) -> Result<FileStream> {
    if path.as_os_str() == STDIN_PATH {
        Ok(FileStream::stdin())
    } else {
        Ok(FileStream::open(path)?)
    }
}

fn open_output(path: Option<&Path>) -> Result<FileStream> {
    match path {
        Some(path) => Ok(FileStream::create(path)?),
        None => Ok(FileStream::stdout()),
    }
}

/// Remove an output file left behind by a failed run.
fn discard_output(path: Option<&Path>) {
    if let Some(path) = path {
        match std::fs::remove_file(path) {
            Ok(()) => info!("removed partial output {}", path.display()),
            Err(e) => warn!("could not remove partial output {}: {}", path.display(), e),
        }
    }
}

fn run(config: &Config) -> Result<()> {
    let output_path = config.output_file.as_deref();

    match config.command {
        Command::Encode | Command::Decode => {
            let input_path = config.input_file.as_deref().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "missing input file")
            })?;
            let mut input = open_input(input_path)?;
            let mut output = open_output(output_path)?;

            let operation = match config.command {
                Command::Decode => Operation::Decode,
                _ => Operation::Encode,
            };
            let mut metrics = Metrics::new(operation);

            let result = match operation {
                Operation::Encode => {
                    encode(&mut input, &mut output).map(|summary| metrics.record_encode(&summary))
                }
                Operation::Decode => {
                    decode(&mut input, &mut output).map(|summary| metrics.record_decode(&summary))
                }
            };

            if let Err(e) = result {
                drop(output);
                discard_output(output_path);
                return Err(e);
            }

            metrics.complete();
            info!(
                "{} -> {} bytes in {} ms",
                metrics.input_bytes,
                metrics.output_bytes,
                metrics.duration().as_millis()
            );
            if config.print_metrics {
                metrics.print_summary();
            }
        }

        Command::Sample => {
            let data = input_gen::generate_sample_data(config.seed, config.sample_bytes);
            let mut output = open_output(output_path)?;
            let written = output.write_all(&data).and_then(|()| output.flush());
            if let Err(e) = written {
                drop(output);
                discard_output(output_path);
                return Err(e.into());
            }
            info!("wrote {} sample bytes (seed {})", data.len(), config.seed);
        }
    }

    Ok(())
}
