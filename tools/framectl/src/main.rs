//! framectl - operator tool for scale frame profiles
//!
//! Decodes captured frames against a device profile, builds Modbus read
//! requests for polling scales, and checks or converts profile documents
//! before they are deployed.

mod check;
mod convert;
mod decode;
mod request;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use tracing::debug;

use crate::settings::{OutputFormat, Settings};

#[derive(Parser)]
#[command(name = "framectl")]
#[command(about = "Decode and check industrial scale frames")]
#[command(long_about = "Decode and check industrial scale frames

Examples:
  framectl decode -p config/profiles/indicator-ascii.yaml --text '+001240 kg S\\r\\n'
  framectl decode -p platform-hex.yaml --hex 'AA 55 00 00 04 D2 01 03 D4'
  framectl request --slave 1 --start 0 --count 4
  framectl check config/profiles/*.yaml
  framectl convert legacy.yaml legacy.toml")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Settings file (default: ./framectl.toml or ./framectl.yaml)
    #[arg(short = 's', long, global = true, env = "FRAMECTL_SETTINGS")]
    settings: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode one frame against a device profile
    #[command(group(ArgGroup::new("input").required(true).args(["hex", "text"])))]
    Decode {
        /// Device profile (YAML, JSON or TOML)
        #[arg(short, long)]
        profile: PathBuf,

        /// Frame as hex bytes, e.g. "AA 55 00 04"
        #[arg(long)]
        hex: Option<String>,

        /// Frame as text; \r \n \t \\ and \xNN escapes are expanded
        #[arg(long)]
        text: Option<String>,
    },

    /// Build a Modbus RTU read request frame
    Request {
        /// Slave address
        #[arg(long, value_parser = request::parse_u8)]
        slave: u8,

        /// Function code (3 = holding, 4 = input registers)
        #[arg(short, long, default_value = "3", value_parser = request::parse_u8)]
        function: u8,

        /// First register address
        #[arg(long, default_value = "0", value_parser = request::parse_u16)]
        start: u16,

        /// Number of registers
        #[arg(long, value_parser = request::parse_u16)]
        count: u16,
    },

    /// Check device profiles for configuration problems
    Check {
        /// Profile files to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Rewrite a profile as YAML, JSON or TOML (chosen by extension)
    Convert {
        input: PathBuf,
        output: PathBuf,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.settings.as_deref())?;
    if cli.verbose {
        settings.log.level = "debug".to_string();
    }
    if cli.no_color || !settings.color {
        colored::control::set_override(false);
        settings.log.ansi = false;
    }
    if cli.json {
        settings.output = OutputFormat::Json;
    }

    // Keep the guard alive so file logs are flushed on exit
    let _guard = scale_common::init_logging(&settings.log)?;
    debug!(output = ?settings.output, "framectl started");

    let ok = match cli.command {
        Commands::Decode { profile, hex, text } => {
            let input = match (hex, text) {
                (Some(hex), _) => decode::FrameInput::Hex(hex),
                (None, Some(text)) => decode::FrameInput::Text(text),
                (None, None) => anyhow::bail!("one of --hex or --text is required"),
            };
            decode::run(&settings, &profile, &input)?
        },
        Commands::Request {
            slave,
            function,
            start,
            count,
        } => request::run(&settings, slave, function, start, count)?,
        Commands::Check { paths } => check::run(&settings, &paths)?,
        Commands::Convert { input, output } => convert::run(&settings, &input, &output)?,
    };

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
