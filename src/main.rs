use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

use pragmash::{parse_program_with_limits, Blocks, ParseLimits, Result};

#[derive(Parser)]
#[command(name = "pragmash")]
#[command(about = "Parse pragmash scripts into block trees")]
struct Cli {
    /// Log parser progress at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a script and print its block tree
    Parse {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Parse a script and report only whether it is well-formed
    Check {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Script path; reads stdin when absent or `-`
    file: Option<PathBuf>,

    /// TOML file with a [limits] table
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Debug,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let outcome = match &cli.command {
        Commands::Parse { input, format } => parse_input(input).and_then(|blocks| print_blocks(&blocks, *format)),
        Commands::Check { input } => parse_input(input).map(|_| println!("ok")),
    };

    if let Err(e) = outcome {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn parse_input(input: &InputArgs) -> Result<Blocks> {
    let limits = match &input.config {
        Some(path) => ParseLimits::from_toml_file(path)?,
        None => ParseLimits::default(),
    };

    let source = match &input.file {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    parse_program_with_limits(&source, &limits)
}

fn print_blocks(blocks: &Blocks, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(blocks)?);
        }
        Format::Debug => println!("{:#?}", blocks),
    }
    Ok(())
}
