//! Configuration for the huffpack command-line tool.
//!
//! Parses the command, its positional paths and a handful of flags. Every
//! omitted output path means standard output, so the tool composes with
//! pipes:
//!
//! ```text
//! huffpack encode notes.txt | huffpack decode -
//! ```

use std::path::PathBuf;

/// Input path that means standard input (decode only).
pub const STDIN_PATH: &str = "-";

/// Default size of a generated sample file.
const DEFAULT_SAMPLE_BYTES: usize = 256 * 1024;

/// What the tool should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Compress a file into a container
    Encode,
    /// Restore a file from a container
    Decode,
    /// Write a generated sample file to try the codec on
    Sample,
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,

    // === Files ===
    /// Input file path (encode/decode only; `-` = standard input for decode)
    pub input_file: Option<PathBuf>,

    /// Output file path (None = standard output)
    pub output_file: Option<PathBuf>,

    // === Sample generation ===
    /// Seed for sample data
    pub seed: u64,

    /// Bytes of sample data to generate
    pub sample_bytes: usize,

    // === Behavior ===
    /// 0 = warnings only, 1 = info, 2 = debug, 3+ = trace
    pub verbosity: u8,

    /// Whether to print the resolved config
    pub print_config: bool,

    /// Whether to print the metrics summary
    pub print_metrics: bool,
}

impl Config {
    /// Parse configuration from command-line arguments (program name excluded).
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut command: Option<Command> = None;
        let mut positionals: Vec<PathBuf> = Vec::new();
        let mut seed: Option<u64> = None;
        let mut sample_bytes: Option<usize> = None;
        let mut verbosity = 0u8;
        let mut print_config = false;
        let mut print_metrics = true;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--seed" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--seed requires a number".to_string());
                    }
                    seed = Some(args[i].parse().map_err(|_| "invalid seed")?);
                }
                "--size" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--size requires a number".to_string());
                    }
                    sample_bytes = Some(args[i].parse().map_err(|_| "invalid size")?);
                }
                "-v" => verbosity = verbosity.saturating_add(1),
                "-vv" => verbosity = verbosity.saturating_add(2),
                "-vvv" => verbosity = verbosity.saturating_add(3),
                "--print-config" => {
                    print_config = true;
                }
                "--no-metrics" | "-q" => {
                    print_metrics = false;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                arg if command.is_none() => {
                    command = Some(parse_command(arg)?);
                }
                arg if arg.starts_with("--") => {
                    return Err(format!("unknown argument: {}", arg));
                }
                arg => positionals.push(PathBuf::from(arg)),
            }
            i += 1;
        }

        let command = command.ok_or("missing command (encode, decode or sample)")?;
        let mut positionals = positionals.into_iter();

        let (input_file, output_file) = match command {
            Command::Encode | Command::Decode => {
                let input = positionals.next().ok_or("missing input file")?;
                if command == Command::Encode && input.as_os_str() == STDIN_PATH {
                    return Err("encode reads its input twice; pass a file, not -".to_string());
                }
                (Some(input), positionals.next())
            }
            Command::Sample => (None, positionals.next()),
        };

        if let Some(extra) = positionals.next() {
            return Err(format!("unexpected argument: {}", extra.display()));
        }

        // Time-based seed unless one was given
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|t| t.as_millis() as u64)
                .unwrap_or(0)
        });

        Ok(Config {
            command,
            input_file,
            output_file,
            seed,
            sample_bytes: sample_bytes.unwrap_or(DEFAULT_SAMPLE_BYTES),
            verbosity,
            print_config,
            print_metrics,
        })
    }

    /// Print the configuration in human-readable form (to stderr).
    pub fn print(&self) {
        let show = |path: &Option<PathBuf>| {
            path.as_ref()
                .map_or_else(|| "(stdout)".to_string(), |p| p.display().to_string())
        };

        eprintln!("=== Configuration ===");
        eprintln!("Command:     {:?}", self.command);
        if let Some(input) = &self.input_file {
            eprintln!("Input file:  {}", input.display());
        }
        eprintln!("Output file: {}", show(&self.output_file));
        if self.command == Command::Sample {
            eprintln!("Seed:        {}", self.seed);
            eprintln!("Size:        {} bytes", self.sample_bytes);
        }
        eprintln!("Verbosity:   {}", self.verbosity);
        eprintln!();
    }
}

fn parse_command(arg: &str) -> Result<Command, String> {
    match arg {
        "encode" | "e" | "-e" => Ok(Command::Encode),
        "decode" | "d" | "-d" => Ok(Command::Decode),
        "sample" => Ok(Command::Sample),
        _ => Err(format!("unknown action: {}", arg)),
    }
}

fn print_help() {
    println!("huffpack: static Huffman compressor");
    println!();
    println!("USAGE:");
    println!("    huffpack encode <INPUT> [OUTPUT]");
    println!("    huffpack decode <INPUT|-> [OUTPUT]");
    println!("    huffpack sample [OUTPUT] [--size <N>] [--seed <N>]");
    println!();
    println!("    OUTPUT defaults to standard output. INPUT must be a regular file");
    println!("    when encoding, since it is read twice.");
    println!();
    println!("OPTIONS:");
    println!("    --size <N>              Sample size in bytes (default: 262144)");
    println!("    --seed <N>              Sample seed (default: time-based)");
    println!();
    println!("    -v, -vv, -vvv           Log info, debug or trace output (or set RUST_LOG)");
    println!("    --print-config          Print resolved configuration");
    println!("    --no-metrics, -q        Don't print the metrics summary");
    println!("    --help, -h              Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    huffpack encode notes.txt notes.he");
    println!("    huffpack decode notes.he notes.txt");
    println!("    huffpack -e notes.txt | huffpack -d - > notes.txt");
    println!("    huffpack -e notes.txt > notes.he");
    println!("    huffpack sample sample.bin --seed 42");
    println!();
}
