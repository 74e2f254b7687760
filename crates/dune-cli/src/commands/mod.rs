pub mod character;
pub mod damage;
pub mod extended;
pub mod initiative;
pub mod momentum;
pub mod npc;
pub mod roll;
pub mod validate;

use colored::Colorize;
use rand::SeedableRng;
use rand::rngs::StdRng;

use dune_mechanics::{ClassifiedDie, RollResult};
use dune_table::{CharacterRoster, JsonPoolStore, MomentumTracker, NpcRoster, TableConfig};

/// Seeded RNG when configured, OS entropy otherwise.
fn rng(config: &TableConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn open_pools(config: &TableConfig) -> Result<MomentumTracker<JsonPoolStore>, String> {
    MomentumTracker::open(JsonPoolStore::new(config.momentum_path()))
        .map_err(|e| format!("failed to load momentum pools: {e}"))
}

/// Load the roster, writing it back straight away if any record was upgraded.
fn open_characters(config: &TableConfig) -> Result<CharacterRoster, String> {
    let (roster, report) =
        CharacterRoster::load(config.characters_path(), config.max_characters_per_user)
            .map_err(|e| format!("failed to load characters: {e}"))?;
    if report.migrated > 0 {
        tracing::info!(migrated = report.migrated, "saving upgraded character records");
        roster.save().map_err(|e| e.to_string())?;
    }
    Ok(roster)
}

fn open_npcs(config: &TableConfig) -> Result<NpcRoster, String> {
    NpcRoster::load(config.npcs_path()).map_err(|e| format!("failed to load NPCs: {e}"))
}

/// Warn when pool changes are only held in memory.
fn warn_if_unsaved(tracker: &MomentumTracker<JsonPoolStore>) {
    if tracker.has_unsaved_changes() {
        eprintln!(
            "  {} pool changes could not be saved to {}",
            "warning:".yellow(),
            tracker.store().path().display()
        );
    }
}

fn render_die(die: &ClassifiedDie) -> String {
    let value = die.value.to_string();
    match (die.critical, die.complication, die.successes > 0) {
        (true, _, _) => format!("{}", value.green().bold()),
        (false, true, _) => format!("{}", value.red().bold()),
        (false, false, true) => format!("{}", value.green()),
        (false, false, false) => format!("{}", value.dimmed()),
    }
}

/// Print a resolved test.
fn print_result(result: &RollResult) {
    let dice: Vec<String> = result.classified().iter().map(render_die).collect();
    println!("  Dice: {}", dice.join(" "));
    println!(
        "  Successes: {} | Critical hits: {} | Complications: {}",
        result.successes, result.critical_hits, result.complications
    );
    let outcome = result.outcome().to_string();
    let outcome = if result.success {
        outcome.green().bold()
    } else {
        outcome.red().bold()
    };
    println!("  Outcome: {outcome}");
    println!(
        "  Momentum +{} | Threat +{}",
        result.momentum_generated, result.threat_generated
    );
}
