//! streamframe CLI - frame a telemetry stream and print one JSON line per
//! message.
//!
//! ```text
//! streamframe --grammar sentence --checksum xor --records capture.log
//! cat /dev/ttyUSB0 | streamframe --grammar brace
//! ```

use std::fmt::Debug;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;

use streamframe_hal::UartConfig;
use streamframe_link::{ChecksumMode, Grammar, IoPort, Link, LinkConfig, Traced};
use streamframe_protocol::{BraceFramer, DecodeError, Framer, InsRecord, Locked, ParsedSentence, SentenceFramer};

#[derive(Parser)]
#[command(name = "streamframe")]
#[command(version)]
#[command(about = "Frame brace-delimited JSON or $...*CC sentences from a stream")]
struct Cli {
    /// TOML link configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Framing grammar (brace or sentence), overrides the config file
    #[arg(long)]
    grammar: Option<Grammar>,

    /// Sentence checksum (none or xor), overrides the config file
    #[arg(long)]
    checksum: Option<ChecksumMode>,

    /// Decode $GTIMU / $GPFPD sentences into records
    #[arg(long)]
    records: bool,

    /// Log every framed message
    #[arg(long)]
    trace: bool,

    /// Input file (default: `[port] path` when --config is given, else stdin)
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => LinkConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => LinkConfig::default(),
    };
    if let Some(grammar) = cli.grammar {
        config.framing.grammar = grammar;
    }
    if let Some(checksum) = cli.checksum {
        config.framing.checksum = checksum;
    }
    config.debug.trace |= cli.trace;

    // The port path only applies when a config file names one
    let port_path = cli.config.as_ref().map(|_| Path::new(&config.port.path));
    let port = IoPort::new(open_input(cli.input.as_deref(), port_path)?);
    let mut out = io::stdout().lock();

    let count = match config.framing.grammar {
        Grammar::Brace => frame(port, &config, BraceFramer::<Value>::new(), |msg| {
            print_brace(&mut out, msg)
        })?,
        Grammar::Sentence => {
            let framer = SentenceFramer::with_checksum(config.framing.checksum);
            let records = cli.records;
            frame(port, &config, framer, |sentence| {
                print_sentence(&mut out, sentence, records)
            })?
        }
    };

    info!("{} messages framed", count);
    Ok(())
}

/// Open INPUT if given, else the configured port, else stdin
fn open_input(input: Option<&Path>, port_path: Option<&Path>) -> Result<Box<dyn Read>> {
    match input.or(port_path) {
        Some(path) => {
            info!("Reading {}", path.display());
            let file =
                File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

/// Apply the `[debug]` wrappers and run the link to end of stream
fn frame<R, F, H>(port: IoPort<R>, config: &LinkConfig, framer: F, handler: H) -> Result<usize>
where
    R: Read,
    F: Framer,
    F::Output: Debug,
    H: FnMut(F::Output) -> Result<()>,
{
    let uart = config.port.uart_config();
    match (config.debug.lock, config.debug.trace) {
        (false, false) => drive(port, uart, framer, handler),
        (false, true) => drive(port, uart, Traced::new("framer", framer), handler),
        (true, false) => drive(port, uart, Locked::<CriticalSectionRawMutex, _>::new(framer), handler),
        (true, true) => drive(
            port,
            uart,
            Traced::new("framer", Locked::<CriticalSectionRawMutex, _>::new(framer)),
            handler,
        ),
    }
}

fn drive<R, F, H>(port: IoPort<R>, uart: UartConfig, framer: F, mut handler: H) -> Result<usize>
where
    R: Read,
    F: Framer,
    H: FnMut(F::Output) -> Result<()>,
{
    let mut link = Link::open(port, uart, framer).context("failed to open link")?;

    // The handler is fallible (stdout may close); keep the first failure
    let mut failure = None;
    let count = link
        .run(|msg| {
            if failure.is_none() {
                failure = handler(msg).err();
            }
        })
        .context("link failed")?;

    link.close().context("failed to close link")?;
    match failure {
        Some(e) => Err(e),
        None => Ok(count),
    }
}

fn print_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn print_brace<W: Write>(out: &mut W, msg: Result<Value, DecodeError>) -> Result<()> {
    match msg {
        Ok(value) => print_json(out, &value),
        Err(e) => {
            warn!("Dropping message: {}", e);
            Ok(())
        }
    }
}

fn print_sentence<W: Write>(out: &mut W, sentence: ParsedSentence, records: bool) -> Result<()> {
    if !records {
        return print_json(out, &sentence);
    }
    match InsRecord::from_sentence(&sentence) {
        Ok(record) => print_json(out, &record),
        Err(e) => {
            warn!("Skipping {}: {}", sentence.header, e);
            Ok(())
        }
    }
}
