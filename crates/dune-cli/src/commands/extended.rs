use clap::Args;
use colored::Colorize;

use dune_mechanics::resolution::ExtendedTest;
use dune_mechanics::{RollRequest, resolve};
use dune_table::TableConfig;

#[derive(Args)]
pub struct ExtendedArgs {
    /// Target number (skill + drive)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=20))]
    target: u32,

    /// Successes needed across all rolls
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    goal: u32,

    /// Most rolls allowed
    #[arg(
        short,
        long,
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..=100)
    )]
    limit: u32,

    /// Extra d20s on every roll
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=5))]
    bonus: u32,
}

pub fn run(config: &TableConfig, args: &ExtendedArgs) -> Result<(), String> {
    let test = ExtendedTest::new(args.goal).with_time_limit(args.limit);
    let request = RollRequest::new(args.target).with_bonus_dice(args.bonus);
    let mut rng = super::rng(config);
    let mut results = Vec::new();

    println!(
        "  {} {} successes at target {} within {} rolls",
        "Extended test:".bold(),
        args.goal,
        args.target,
        args.limit
    );

    loop {
        let result = resolve(&request, &mut rng).map_err(|e| e.to_string())?;
        println!("  Roll {}: {result}", results.len() + 1);
        results.push(result);

        let progress = test.progress(&results);
        println!(
            "    {}/{} successes ({:.0}%)",
            progress.total_successes, args.goal, progress.percent
        );
        if progress.complete {
            println!(
                "  {} after {} rolls, {} complications",
                "Complete".green().bold(),
                results.len(),
                progress.complications
            );
            return Ok(());
        }
        if progress.time_remaining == Some(0) {
            println!(
                "  {} with {} of {} successes, {} complications",
                "Out of time".red().bold(),
                progress.total_successes,
                args.goal,
                progress.complications
            );
            return Ok(());
        }
    }
}
