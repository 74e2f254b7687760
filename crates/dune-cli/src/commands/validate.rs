use clap::ValueEnum;
use colored::Colorize;

use dune_mechanics::{PointBuy, parse_assignment};

#[derive(Clone, Copy, ValueEnum)]
pub enum AssignmentKind {
    /// Battle, Communicate, Discipline, Move, Understand
    Skills,
    /// Duty, Faith, Justice, Power, Truth
    Drives,
}

pub fn run(kind: AssignmentKind, input: &str) -> Result<(), String> {
    let assignment = parse_assignment(input).map_err(|e| e.to_string())?;
    let rules = match kind {
        AssignmentKind::Skills => PointBuy::skills(),
        AssignmentKind::Drives => PointBuy::drives(),
    };

    let result = rules.validate(&assignment);
    if result.is_valid() {
        println!("{}", "valid".green());
        return Ok(());
    }
    println!("{}", result.message());
    Err(format!("{} problem(s) found", result.errors.len()))
}
