use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use binpack_codec::{ByteOrder, PackConfig, PrefixWidth};
use clap::{Args, Subcommand, ValueEnum};

use crate::exit::{io_error, CliResult};
use crate::output::OutputFormat;

pub mod prefix;
pub mod records;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write an input with a length prefix prepended.
    Prefix(PrefixArgs),
    /// List the records of a length-prefixed stream.
    Records(RecordsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat, config: &PackConfig) -> CliResult<i32> {
    match command {
        Command::Prefix(args) => prefix::run(args, config),
        Command::Records(args) => records::run(args, format, config),
        Command::Version(args) => version::run(args, config),
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ByteOrderArg {
    Little,
    Big,
}

impl From<ByteOrderArg> for ByteOrder {
    fn from(arg: ByteOrderArg) -> Self {
        match arg {
            ByteOrderArg::Little => ByteOrder::Little,
            ByteOrderArg::Big => ByteOrder::Big,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum WidthArg {
    #[value(name = "16")]
    U16,
    #[value(name = "32")]
    U32,
    #[value(name = "64")]
    U64,
}

impl From<WidthArg> for PrefixWidth {
    fn from(arg: WidthArg) -> Self {
        match arg {
            WidthArg::U16 => PrefixWidth::U16,
            WidthArg::U32 => PrefixWidth::U32,
            WidthArg::U64 => PrefixWidth::U64,
        }
    }
}

#[derive(Args, Debug)]
pub struct PrefixArgs {
    /// Input file (`-` for stdin).
    pub input: PathBuf,
    /// Length prefix width in bits.
    #[arg(long, short = 'w', default_value = "32")]
    pub width: WidthArg,
    /// Output file. Default: stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
    /// Append to the output file instead of truncating it.
    #[arg(long, requires = "output")]
    pub append: bool,
}

#[derive(Args, Debug)]
pub struct RecordsArgs {
    /// Input file (`-` for stdin).
    pub input: PathBuf,
    /// Length prefix width in bits.
    #[arg(long, short = 'w', default_value = "32")]
    pub width: WidthArg,
    /// Stop after N records.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show build and configuration details.
    #[arg(long)]
    pub extended: bool,
}

/// Open `path` for reading, treating `-` as stdin.
pub(crate) fn open_input(path: &Path) -> CliResult<Box<dyn Read>> {
    if path == Path::new("-") {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path)
        .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
    Ok(Box::new(file))
}
