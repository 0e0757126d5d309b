//! LoopChamber CLI - Memory fragment scoring and review
//!
//! Terminal front end over the LoopChamber store: enter fragments, see their
//! musical scores, and review what has been kept.

mod config;
mod lab;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use dialoguer::{Confirm, Input};
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use config::Config;
use loopchamber::analysis::{self, BrowseFilter, SortOrder, StarPoint, StoreSummary};
use loopchamber::{
    validate, Emotion, FragmentKind, HeuristicScorer, JsonMemoryStore, MemoryCandidate,
    MemoryRecord, MemoryRepository, MemoryScorer, MusicalScore,
};

#[derive(Parser)]
#[command(name = "loopchamber")]
#[command(about = "LoopChamber - score and keep memory fragments", long_about = None)]
#[command(version)]
struct Cli {
    /// Memory document to use (overrides the configured path)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Log store operations to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score and save a memory
    Add {
        /// Memory content (or use -f for file)
        content: Option<String>,
        /// Read content from file
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Fragment kind (insight, question, observation, event, reflection)
        #[arg(short = 't', long)]
        kind: Option<FragmentKind>,
    },

    /// List stored memories
    List {
        /// Only show this fragment kind
        #[arg(short = 't', long)]
        kind: Option<FragmentKind>,
        /// Only show this emotion
        #[arg(short, long)]
        emotion: Option<Emotion>,
        /// Order: newest, oldest, pitch, dissonance, tempo
        #[arg(short, long, default_value = "oldest")]
        sort: SortOrder,
    },

    /// Show the most dissonant memories
    Dissonant {
        /// How many to show
        #[arg(short = 'n', long, default_value = "5")]
        limit: usize,
    },

    /// Show memories grouped by emotion
    Emotions,

    /// Show collection statistics
    Stats,

    /// Show starfield coordinates (dissonance x pitch, size = tempo)
    Starfield,

    /// Score text without saving it
    Score {
        text: String,
        /// Fragment kind (defaults to the configured kind)
        #[arg(short = 't', long)]
        kind: Option<FragmentKind>,
    },

    /// Delete every stored memory
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Interactive memory lab
    Lab,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set the memory document location
    SetStore {
        path: PathBuf,
    },
    /// Set the default fragment kind
    SetKind {
        kind: FragmentKind,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store_override = cli.store;

    match cli.command {
        Commands::Add { content, file, kind } => cmd_add(store_override, content, file, kind),
        Commands::List {
            kind,
            emotion,
            sort,
        } => cmd_list(store_override, BrowseFilter { kind, emotion }, sort),
        Commands::Dissonant { limit } => cmd_dissonant(store_override, limit),
        Commands::Emotions => cmd_emotions(store_override),
        Commands::Stats => cmd_stats(store_override),
        Commands::Starfield => cmd_starfield(store_override),
        Commands::Score { text, kind } => cmd_score(text, kind),
        Commands::Reset { yes } => cmd_reset(store_override, yes),
        Commands::Lab => cmd_lab(store_override),
        Commands::Config { action } => {
            cmd_config(store_override, action.unwrap_or(ConfigAction::Show))
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ============================================
// Command Implementations
// ============================================

fn open_store(config: &Config, store_override: Option<PathBuf>) -> Result<JsonMemoryStore> {
    let path = config.resolve_store_path(store_override.as_deref())?;
    debug!(path = %path.display(), "Opening memory store");
    JsonMemoryStore::open(&path)
        .with_context(|| format!("Failed to open memory store {:?}; the file was left as is", path))
}

fn cmd_add(
    store_override: Option<PathBuf>,
    content: Option<String>,
    file: Option<PathBuf>,
    kind: Option<FragmentKind>,
) -> Result<()> {
    let config = Config::load()?;
    let mut store = open_store(&config, store_override)?;
    let kind = kind.unwrap_or(config.default_kind);

    // Get content from file or argument
    let text = match (content, file) {
        (Some(c), None) => c,
        (None, Some(f)) => {
            fs::read_to_string(&f).with_context(|| format!("Failed to read file: {:?}", f))?
        }
        (Some(_), Some(_)) => {
            bail!("Cannot specify both content and --file");
        }
        (None, None) => {
            // Interactive input
            Input::new()
                .with_prompt("Memory content")
                .allow_empty(true)
                .interact_text()
                .context("Failed to read input")?
        }
    };

    let record = add_memory(&mut store, &HeuristicScorer::new(), text, kind)?;

    println!("{} Memory added [{}]", "✓".green(), record.kind());
    print_score(&record.score());
    println!("  {}", truncate_string(record.text(), config.preview_width).dimmed());

    Ok(())
}

/// Score, validate and persist one fragment
pub(crate) fn add_memory<R: MemoryRepository, S: MemoryScorer>(
    repo: &mut R,
    scorer: &S,
    text: String,
    kind: FragmentKind,
) -> Result<MemoryRecord> {
    let score = scorer.score(&text, kind);
    let record = validate(MemoryCandidate::from_score(text, kind, &score))
        .context("Memory not saved")?;

    repo.save(record.clone())
        .context("Failed to save memory; previously saved memories are unchanged")?;

    Ok(record)
}

fn cmd_list(store_override: Option<PathBuf>, filter: BrowseFilter, sort: SortOrder) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config, store_override)?;

    if store.all().is_empty() {
        print_empty_hint();
        return Ok(());
    }

    let entries = analysis::browse(store.all(), &filter, sort);
    if entries.is_empty() {
        println!("No memories match the given filters.");
        return Ok(());
    }

    println!("{} ({}, {} of {})", "Memories:".bold(), sort, entries.len(), store.all().len());
    print_entries(&entries, config.preview_width);
    Ok(())
}

fn cmd_dissonant(store_override: Option<PathBuf>, limit: usize) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config, store_override)?;
    print_dissonant(store.all(), limit, config.preview_width);
    Ok(())
}

fn cmd_emotions(store_override: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config, store_override)?;
    print_emotion_groups(store.all(), config.preview_width);
    Ok(())
}

fn cmd_stats(store_override: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config, store_override)?;
    print_summary(&analysis::summarize(store.all()));
    Ok(())
}

fn cmd_starfield(store_override: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let store = open_store(&config, store_override)?;
    print_starfield(&analysis::starfield(store.all()));
    Ok(())
}

fn cmd_score(text: String, kind: Option<FragmentKind>) -> Result<()> {
    let config = Config::load()?;
    let kind = kind.unwrap_or(config.default_kind);
    let score = HeuristicScorer::new().score(&text, kind);

    println!("{} [{}] (not saved)", "Score".bold(), kind);
    print_score(&score);

    Ok(())
}

fn cmd_reset(store_override: Option<PathBuf>, yes: bool) -> Result<()> {
    let config = Config::load()?;
    let mut store = open_store(&config, store_override)?;

    if !yes && !confirm_reset(store.all().len())? {
        println!("Reset cancelled.");
        return Ok(());
    }

    store.reset().context("Failed to reset memory store")?;
    println!("{} Memory store cleared", "✓".green());

    Ok(())
}

pub(crate) fn confirm_reset(count: usize) -> Result<bool> {
    Confirm::new()
        .with_prompt(format!("Delete all {} memories?", count))
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

fn cmd_lab(store_override: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let mut store = open_store(&config, store_override)?;
    lab::run(&config, &mut store, &HeuristicScorer::new())
}

fn cmd_config(store_override: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    let mut config = Config::load()?;

    match action {
        ConfigAction::Show => {
            println!("{}", "Configuration:".bold());
            println!("  Path: {:?}", Config::config_path()?);
            println!(
                "  Store: {:?}",
                config.resolve_store_path(store_override.as_deref())?
            );
            println!("  Default Kind: {}", config.default_kind.to_string().cyan());
            println!("  Preview Width: {}", config.preview_width);
        }

        ConfigAction::SetStore { path } => {
            config.set_store_path(path.clone());
            config.save()?;
            println!("{} Store path set to {:?}", "✓".green(), path);
        }

        ConfigAction::SetKind { kind } => {
            config.set_default_kind(kind);
            config.save()?;
            println!("{} Default kind set to '{}'", "✓".green(), kind);
        }
    }

    Ok(())
}

// ============================================
// Output
// ============================================

pub(crate) fn paint_emotion(emotion: Emotion) -> ColoredString {
    let label = emotion.as_str();
    match emotion {
        Emotion::Positive => label.green(),
        Emotion::Negative => label.red(),
        Emotion::Neutral => label.blue(),
        Emotion::Complex => label.magenta(),
        Emotion::Tense => label.yellow(),
    }
}

pub(crate) fn print_score(score: &MusicalScore) {
    println!(
        "  pitch {:.2}  tempo {:.2}  dissonance {:.2}  emotion {}",
        score.pitch,
        score.tempo,
        score.dissonance,
        paint_emotion(score.emotion)
    );
}

fn print_empty_hint() {
    println!("No memories stored yet.");
    println!("\n{}", "Add one with:".dimmed());
    println!("  loopchamber add \"<memory>\"");
}

pub(crate) fn print_list(records: &[MemoryRecord], preview_width: usize) {
    if records.is_empty() {
        print_empty_hint();
        return;
    }

    println!("{}", "Memories:".bold());
    let entries: Vec<(usize, &MemoryRecord)> = records.iter().enumerate().collect();
    print_entries(&entries, preview_width);
}

/// Print `(position, record)` pairs numbered by their position in the store
fn print_entries(entries: &[(usize, &MemoryRecord)], preview_width: usize) {
    for (position, record) in entries {
        println!(
            "  {}. {} {}",
            position + 1,
            truncate_string(record.text(), preview_width),
            format!("[{}]", record.kind()).dimmed()
        );
        println!(
            "     pitch {:.2}, tempo {:.2}, dissonance {:.2}, emotion {}, {}",
            record.pitch(),
            record.tempo(),
            record.dissonance(),
            paint_emotion(record.emotion()),
            record.created_at().format("%Y-%m-%d %H:%M").to_string().dimmed()
        );
    }
}

pub(crate) fn print_dissonant(records: &[MemoryRecord], limit: usize, preview_width: usize) {
    let ranked = analysis::top_dissonant(records, limit);
    if ranked.is_empty() {
        println!("No memories yet.");
        return;
    }

    println!("{}", format!("Most dissonant ({}):", ranked.len()).bold());
    print_entries(&ranked, preview_width);
}

pub(crate) fn print_emotion_groups(records: &[MemoryRecord], preview_width: usize) {
    let groups = analysis::group_by_emotion(records);
    if groups.is_empty() {
        println!("No memories yet.");
        return;
    }

    for (emotion, entries) in &groups {
        println!("{} ({})", paint_emotion(*emotion).bold(), entries.len());
        print_entries(entries, preview_width);
    }
}

pub(crate) fn print_summary(summary: &StoreSummary) {
    println!("{}", "System Stats:".bold());
    println!("  Memories: {}", summary.count.to_string().green());

    if summary.count == 0 {
        return;
    }

    let fmt_mean =
        |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v));
    println!("  Mean pitch: {}", fmt_mean(summary.mean_pitch));
    println!("  Mean tempo: {}", fmt_mean(summary.mean_tempo));
    println!("  Mean dissonance: {}", fmt_mean(summary.mean_dissonance));

    println!("  Emotions:");
    for (emotion, count) in &summary.emotions {
        println!("    {}: {}", paint_emotion(*emotion), count);
    }
}

pub(crate) fn print_starfield(points: &[StarPoint]) {
    if points.is_empty() {
        println!("No memories yet. Add some to populate the starfield.");
        return;
    }

    println!("{}", "Memory Starfield:".bold());
    for point in points {
        println!(
            "  Memory {}: dissonance = {:.2}, pitch = {:.2}, tempo = {:.2}, emotion = {}",
            point.index + 1,
            point.x,
            point.y,
            point.size,
            paint_emotion(point.emotion)
        );
    }
    println!(
        "\n{}",
        "Position = tension & importance. Size = recall tempo.".dimmed()
    );
}

/// Truncate string safely for UTF-8 (by char count, not bytes)
pub(crate) fn truncate_string(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        format!("{}...", chars.into_iter().collect::<String>())
    } else {
        s.to_string()
    }
}
