//! Memory Lab - interactive session over one store
//!
//! A failed add or reset is reported and the loop keeps going; the store
//! has already rolled back, so earlier memories stay as they were.

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Input, Select};
use tracing::warn;

use crate::config::Config;
use crate::{
    add_memory, confirm_reset, print_dissonant, print_emotion_groups, print_list, print_score,
    print_starfield, print_summary,
};
use loopchamber::{analysis, FragmentKind, JsonMemoryStore, MemoryRepository, MemoryScorer};

const MENU: [&str; 8] = [
    "Add memory",
    "List memories",
    "Most dissonant",
    "By emotion",
    "Stats",
    "Starfield",
    "Reset",
    "Quit",
];

const DISSONANT_LIMIT: usize = 5;

pub fn run<S: MemoryScorer>(
    config: &Config,
    store: &mut JsonMemoryStore,
    scorer: &S,
) -> Result<()> {
    println!("{}", "Memory Lab".bold());
    println!("{}", format!("Store: {:?}", store.path()).dimmed());

    loop {
        let choice = Select::new()
            .with_prompt("What next?")
            .items(&MENU)
            .default(0)
            .interact()
            .context("Failed to read menu choice")?;

        match choice {
            0 => lab_add(config, store, scorer)?,
            1 => print_list(store.all(), config.preview_width),
            2 => print_dissonant(store.all(), DISSONANT_LIMIT, config.preview_width),
            3 => print_emotion_groups(store.all(), config.preview_width),
            4 => print_summary(&analysis::summarize(store.all())),
            5 => print_starfield(&analysis::starfield(store.all())),
            6 => lab_reset(store)?,
            _ => return Ok(()),
        }
        println!();
    }
}

fn lab_add<S: MemoryScorer>(
    config: &Config,
    store: &mut JsonMemoryStore,
    scorer: &S,
) -> Result<()> {
    let text: String = Input::new()
        .with_prompt("Memory content")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read input")?;

    let kinds: Vec<String> = FragmentKind::ALL.iter().map(|k| k.to_string()).collect();
    let default_index = FragmentKind::ALL
        .iter()
        .position(|k| *k == config.default_kind)
        .unwrap_or(0);
    let kind_index = Select::new()
        .with_prompt("Kind")
        .items(&kinds)
        .default(default_index)
        .interact()
        .context("Failed to read kind")?;
    let kind = FragmentKind::ALL[kind_index];

    match add_memory(store, scorer, text, kind) {
        Ok(record) => {
            println!("{} Memory added [{}]", "✓".green(), record.kind());
            print_score(&record.score());
        }
        Err(e) => {
            let message = format!("{:#}", e);
            warn!(error = %message, "Lab add failed");
            println!("{} {}", "✗".red(), message);
        }
    }

    Ok(())
}

fn lab_reset(store: &mut JsonMemoryStore) -> Result<()> {
    if !confirm_reset(store.all().len())? {
        println!("Reset cancelled.");
        return Ok(());
    }

    match store.reset() {
        Ok(()) => println!("{} Memory store cleared", "✓".green()),
        Err(e) => {
            warn!(path = %store.path().display(), error = %e, "Lab reset failed");
            println!("{} Reset failed: {}", "✗".red(), e);
        }
    }

    Ok(())
}
