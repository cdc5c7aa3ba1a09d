mod cmd;
mod exit;
mod logging;
mod output;

use binpack_codec::{PackConfig, DEFAULT_MAX_LENGTH};
use clap::Parser;

use crate::cmd::{ByteOrderArg, Command};
use crate::logging::LogSettings;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "binpack", version, about = "Length-prefixed binary record tool")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    #[command(flatten)]
    logging: LogSettings,

    /// Byte order of length prefixes.
    #[arg(
        long,
        value_name = "ORDER",
        default_value = "little",
        env = "BINPACK_BYTE_ORDER",
        global = true
    )]
    byte_order: ByteOrderArg,

    /// Largest record payload accepted when reading, in bytes.
    #[arg(
        long,
        value_name = "BYTES",
        default_value_t = DEFAULT_MAX_LENGTH,
        env = "BINPACK_MAX_LENGTH",
        global = true
    )]
    max_length: u64,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn pack_config(&self) -> PackConfig {
        PackConfig {
            byte_order: self.byte_order.into(),
            max_length: self.max_length,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    cli.logging.init();

    let config = cli.pack_config();
    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format, &config);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            if let Some(message) = &err.message {
                eprintln!("error: {message}");
            }
            std::process::exit(err.code);
        }
    }
}
