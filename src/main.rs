//! Command-line interface for zhmatch-rs
//!
//! Usage:
//!   zhmatch translate [--wwstar DIR | -d FILE...] < input.txt
//!   zhmatch combine -d phrases.txt < segmented.txt
//!
//! Input is processed line by line; every input line produces one output line.
//! Output is flushed whenever the input has no more lines ready, so the tool
//! can sit at the end of an interactive pipe.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use zhmatch_rs::loader;
use zhmatch_rs::{CombinerBuilder, Config, DictFormat, PhraseCombiner, Translator, TranslatorBuilder};

#[derive(Parser, Debug)]
#[command(
    name = "zhmatch",
    version,
    about = "Longest-match phrase translation and token recombination"
)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read input from <FILE> instead of stdin
    #[arg(short, long, global = true, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Write output to <FILE> instead of stdout
    #[arg(short, long, global = true, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Encoding of dictionary files (utf-8, gbk, big5, ...)
    #[arg(long, global = true)]
    encoding: Option<String>,

    /// NFC-normalize dictionary keys and input
    #[arg(long, global = true)]
    nfc: bool,

    /// Print the segments of each line as JSON
    #[arg(short, long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replace dictionary phrases with their translations
    Translate {
        /// Dictionary file (repeatable; earlier files take priority)
        #[arg(short, long = "dict", value_name = "FILE")]
        dicts: Vec<PathBuf>,

        /// Layout of the dictionary files
        #[arg(long, value_enum)]
        format: Option<DictFormat>,

        /// WWStar installation directory (default when no dictionary is given: .)
        #[arg(long, value_name = "DIR", conflicts_with = "dicts")]
        wwstar: Option<PathBuf>,
    },
    /// Merge runs of segmented words that form a dictionary phrase
    Combine {
        /// Phrase list file (repeatable)
        #[arg(short, long = "dict", value_name = "FILE")]
        dicts: Vec<PathBuf>,

        /// String placed between the words of a merged phrase
        #[arg(long)]
        joiner: Option<String>,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Capacity of the input buffer; bounds how many lines one batch can hold
const INPUT_BUFFER_SIZE: usize = 1 << 20;

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config '{}'", path.display()))?,
        None => Config::default(),
    };

    if let Some(encoding) = &cli.encoding {
        config.encoding = Some(encoding.clone());
    }
    if cli.nfc {
        config.normalize = true;
    }
    Ok(config)
}

fn build_translator(config: &Config) -> Result<Translator> {
    let mut builder = TranslatorBuilder::new().normalize(config.normalize);

    if config.dictionaries.is_empty() {
        let root = config.wwstar.clone().unwrap_or_else(|| PathBuf::from("."));
        let data = loader::load_wwstar_dir(&root, config.wwstar_encoding())
            .with_context(|| format!("failed to load WWStar data from '{}'", root.display()))?;
        if let Some(title) = data.version.first() {
            info!(version = %title.trim(), files = data.files.len(), "loaded WWStar data");
        }
        builder
            .add_entries(data.entries)
            .context("invalid WWStar entry")?;
    } else {
        let format = config.format.unwrap_or(DictFormat::Tsv);
        for path in &config.dictionaries {
            let entries = loader::load_pairs(path, format, config.encoding())
                .with_context(|| format!("failed to load dictionary '{}'", path.display()))?;
            builder
                .add_entries(entries)
                .with_context(|| format!("invalid entry in '{}'", path.display()))?;
        }
    }

    let translator = builder.build();
    info!(
        phrases = translator.dictionary().len(),
        max_len = translator.dictionary().max_key_len(),
        "translator ready"
    );
    Ok(translator)
}

fn build_combiner(config: &Config) -> Result<PhraseCombiner> {
    if config.dictionaries.is_empty() {
        bail!("combine needs at least one phrase list (--dict)");
    }
    if let Some(format) = config.format.filter(|f| *f != DictFormat::Phrases) {
        bail!("combine reads phrase lists, not '{}' files", format.as_str());
    }

    let mut builder = CombinerBuilder::new()
        .normalize(config.normalize)
        .joiner(config.joiner.clone());
    for path in &config.dictionaries {
        let phrases = loader::load_phrases(path, config.encoding())
            .with_context(|| format!("failed to load phrase list '{}'", path.display()))?;
        for phrase in phrases {
            builder
                .add(phrase)
                .with_context(|| format!("invalid phrase in '{}'", path.display()))?;
        }
    }

    let combiner = builder.build();
    info!(phrases = combiner.dictionary().len(), "combiner ready");
    Ok(combiner)
}

/// What happens to each input line
enum Mode {
    Translate(Translator),
    Combine(PhraseCombiner),
}

struct LineProcessor {
    mode: Mode,
    json: bool,
}

impl LineProcessor {
    /// Apply the subcommand's flags to `config` and build its dictionary
    fn from_command(config: &mut Config, command: Commands, json: bool) -> Result<Self> {
        let mode = match command {
            Commands::Translate {
                dicts,
                format,
                wwstar,
            } => {
                if !dicts.is_empty() {
                    config.dictionaries = dicts;
                }
                if format.is_some() {
                    config.format = format;
                }
                if wwstar.is_some() {
                    config.wwstar = wwstar;
                    config.dictionaries.clear();
                }
                Mode::Translate(build_translator(config)?)
            }
            Commands::Combine { dicts, joiner } => {
                if !dicts.is_empty() {
                    config.dictionaries = dicts;
                }
                if let Some(joiner) = joiner {
                    config.joiner = joiner;
                }
                Mode::Combine(build_combiner(config)?)
            }
        };
        Ok(LineProcessor { mode, json })
    }

    fn process_line(&self, line: &str) -> Result<String> {
        let records = match &self.mode {
            Mode::Translate(translator) => {
                let line = line.trim_end();
                if !self.json {
                    return Ok(translator.translate_line(line));
                }
                translator.segments(line)
            }
            Mode::Combine(combiner) => {
                if !self.json {
                    return Ok(combiner.combine_line(line));
                }
                let tokens: Vec<&str> = line.split_whitespace().collect();
                combiner.segments(&tokens)
            }
        };
        serde_json::to_string(&records).context("failed to serialize segments")
    }

    /// Map every line of a batch, in parallel for large batches; output
    /// order is input order
    fn process_batch(&self, lines: &[String], threshold: usize) -> Result<Vec<String>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            if lines.len() >= threshold {
                return lines.par_iter().map(|line| self.process_line(line)).collect();
            }
        }
        #[cfg(not(feature = "parallel"))]
        let _ = threshold;

        lines.iter().map(|line| self.process_line(line)).collect()
    }

    /// Stream `input` to `output` one batch at a time. Returns the number of
    /// lines processed.
    fn run<R: Read, W: Write>(
        &self,
        input: R,
        output: &mut W,
        threshold: usize,
    ) -> Result<usize> {
        let mut reader = BufReader::with_capacity(INPUT_BUFFER_SIZE, input);
        let mut batch = Vec::new();
        let mut count = 0;

        loop {
            batch.clear();
            let more = read_batch(&mut reader, threshold.max(1), &mut batch)
                .context("failed to read input")?;

            for line in self.process_batch(&batch, threshold)? {
                writeln!(output, "{}", line)?;
            }
            output.flush()?;
            count += batch.len();

            if !more {
                return Ok(count);
            }
        }
    }
}

/// Read up to `limit` lines, stopping early once the reader has nothing
/// buffered so a slow producer still sees each line answered. Returns false
/// at end of input.
///
/// Invalid UTF-8 is replaced with U+FFFD rather than failing the stream.
fn read_batch<R: Read>(
    reader: &mut BufReader<R>,
    limit: usize,
    batch: &mut Vec<String>,
) -> io::Result<bool> {
    let mut buf = Vec::new();

    while batch.len() < limit {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(false);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }

        let line = match String::from_utf8_lossy(&buf) {
            Cow::Borrowed(line) => line.to_string(),
            Cow::Owned(line) => {
                warn!("malformed UTF-8 in input replaced");
                line
            }
        };
        batch.push(line);

        if reader.buffer().is_empty() {
            break;
        }
    }
    Ok(true)
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(&cli)?;
    let processor = LineProcessor::from_command(&mut config, cli.command, cli.json)?;

    let input: Box<dyn Read> = match &cli.input {
        Some(path) => Box::new(
            File::open(path)
                .with_context(|| format!("failed to open input '{}'", path.display()))?,
        ),
        None => Box::new(io::stdin().lock()),
    };
    let output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("failed to create output '{}'", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut output = BufWriter::new(output);

    let lines = processor.run(input, &mut output, config.parallel_threshold)?;
    info!(lines, "done");
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
