use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use cachesim::session::{self, Config};
use clap::Parser;
use color_eyre::eyre::Result;
use log::LevelFilter;
use simple_logger::SimpleLogger;

#[derive(Debug, Clone, Parser)]
#[command(version, about = "Trace LDR/STR programs through a direct-mapped write-back cache")]
struct Cli {
    /// Path to the instruction stream
    #[arg(long, short)]
    input: PathBuf,

    /// Path to the initial memory image
    #[arg(long, short)]
    ram: Option<PathBuf>,

    /// Print a snapshot of the machine after every instruction
    #[arg(long, short, default_value_t = false)]
    debug: bool,

    /// Configure the log level
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            input: cli.input,
            image: cli.ram,
            verbose: cli.debug,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    let cli = Cli::parse();
    SimpleLogger::new().with_level(cli.log_level).init()?; // logging

    let config = Config::from(cli);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    session::run(&config, &mut out)?;
    out.flush()?;

    Ok(())
}
