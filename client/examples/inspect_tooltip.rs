//! Tooltip inspector
//!
//! Parses a saved tooltip fragment and prints what the bot would see, plus
//! how every attacking type fares against it.
//!
//! ```text
//! cargo run --example inspect_tooltip -- great_tusk.html --opponent
//! ```

use anyhow::{Context, Result, bail};
use rotom_battle::{Creature, Effectiveness, Type, effectiveness_against};
use rotom_client::describe;

#[tokio::main]
async fn main() -> Result<()> {
    rotom_client::init_tracing();

    let mut path = None;
    let mut is_opponent = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--opponent" => is_opponent = true,
            _ => path = Some(arg),
        }
    }
    let Some(path) = path else {
        bail!("usage: inspect_tooltip <tooltip.html> [--opponent]");
    };

    let markup = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {path}"))?;
    let creature = Creature::from_tooltip(&markup, is_opponent, "Unknown")
        .with_context(|| format!("{path} is not a tooltip"))?;

    println!("{}", describe(&creature));
    println!();

    for band in Effectiveness::ALL.iter().rev() {
        let types: Vec<&str> = Type::all()
            .iter()
            .filter(|t| t.is_specified())
            .filter(|t| effectiveness_against(**t, &creature) == *band)
            .map(Type::as_str)
            .collect();
        if !types.is_empty() {
            println!("{:>16}: {}", band.descriptor(), types.join(", "));
        }
    }

    Ok(())
}
