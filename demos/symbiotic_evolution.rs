//! Symbiotic Co-Evolution
//!
//! This demo co-evolves 20 ten-bit building blocks and 10 five-gene
//! assemblies against the signed positional sum benchmark. Each assembly
//! concatenates its blocks into one 50-bit sequence whose bits act as signs
//! on square-root weights, so a good assembly needs blocks that balance each
//! other.
//!
//! Set `RUST_LOG=symbiotic_evo=debug` to see crossover and credit events.

use symbiotic_evo::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Symbiotic Co-Evolution ===\n");

    // Optional config file as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => SymbioticConfig::from_json_file(path)?,
        None => SymbioticConfig::default(),
    };
    println!("{}\n", config.to_json_string()?);

    let mut rng = seeded_rng(42);
    let mut evolution = SymbioticEvolution::builder()
        .config(config)
        .evaluator(PerIndividual::new(SignedPositionalSum::new()))
        .reporter(TracingReporter)
        .termination(TargetFitness::with_tolerance(0.0, 1e-6))
        .build(&mut rng)?;
    let result = evolution.run(&mut rng)?;

    println!("\n{}", result.stats.summary());

    if let Some(best) = &result.best {
        println!("\nBest assembly (generation {}):", best.generation);
        for (handle, genome) in best.refs.iter().zip(&best.genomes) {
            println!("  {handle} {genome}");
        }
        println!("  fitness = {:.6}", best.fitness);
    }

    let partial = evolution.partial();
    if let Some(block) = partial.best() {
        println!(
            "\nBest building block: {} (credited fitness {:.6})",
            block.genome(),
            block.fitness()
        );
    }

    Ok(())
}
