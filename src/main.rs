//! # typeahead
//!
//! Word completion for the terminal: type, pick a suggestion with the
//! hotkeys, and the rest of the word is typed for you.

use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use typeahead::terminal::{RawMode, TerminalDisplay, TerminalInjector, TerminalKeySource};
use typeahead::{CompletionClient, HotkeyMap, Key, LoopbackInjector, PipelineBuilder, PipelineConfig, WordTree};

/// Suggest completions for the word being typed.
#[derive(Debug, Parser)]
#[command(name = "typeahead", version, about)]
struct Cli {
    /// Dictionary file: optional entry count, then `word rank` per line.
    #[arg(short, long, env = "TYPEAHEAD_DICTIONARY")]
    dictionary: PathBuf,

    /// Suggestions shown per word.
    #[arg(short = 'n', long, default_value_t = 5)]
    suggestions: usize,

    /// Selection refreshes per second.
    #[arg(long, default_value_t = 20)]
    refresh_rate: u32,

    /// Capture loop receive timeout in milliseconds.
    #[arg(long, default_value_t = 2000)]
    timeout_ms: u64,

    /// Key that stops the pipeline.
    #[arg(long, default_value = "esc")]
    exit_key: String,

    /// Chord highlighting the previous suggestion.
    #[arg(long, default_value = "alt+left")]
    prev_key: String,

    /// Chord highlighting the next suggestion.
    #[arg(long, default_value = "alt+right")]
    next_key: String,

    /// Chord typing the rest of the highlighted suggestion.
    #[arg(long, default_value = "ctrl+space")]
    commit_key: String,

    /// Log file (defaults to `typeahead.log` in the temp directory).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> anyhow::Result<PipelineConfig> {
        let config = PipelineConfig {
            suggestions: self.suggestions,
            receive_timeout: Duration::from_millis(self.timeout_ms),
            refresh_rate: self.refresh_rate,
            exit_key: Key::from_name(&self.exit_key),
            hotkeys: HotkeyMap::parse(&self.prev_key, &self.next_key, &self.commit_key)?,
            ..PipelineConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("typeahead=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("typeahead.log"));
    init_logging(&log_path)?;

    let config = cli.config()?;
    let rows = u16::try_from(config.suggestions).unwrap_or(u16::MAX);
    let hotkeys = config.hotkeys.clone();

    // Fail before touching the terminal if the engine cannot start.
    let client = CompletionClient::connect(WordTree::new(), &cli.dictionary)
        .with_context(|| format!("loading dictionary {}", cli.dictionary.display()))?;

    let builder = PipelineBuilder::new(config)?;
    let injector = TerminalInjector::new(LoopbackInjector::new(builder.event_sender()));

    let raw_mode = RawMode::enable()?;
    let pipeline = builder.start(client, TerminalDisplay::new(rows), injector)?;

    let mut source = TerminalKeySource::new(pipeline.event_sender(), pipeline.command_sender(), hotkeys);
    let result = source.run(|| pipeline.is_finished());

    pipeline.shutdown();
    pipeline.join();
    drop(raw_mode);
    println!();

    tracing::info!("typeahead exited");
    result.map_err(Into::into)
}
