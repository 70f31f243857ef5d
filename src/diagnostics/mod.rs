//! Diagnostics and statistics
//!
//! Per-generation progress records, the sinks that receive them, and the
//! fitness history kept for a whole run.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Progress record emitted once per completed generation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Generation number, starting at 1
    ///
    /// The record of loop iteration `g` (counted from 0) carries `g + 1`.
    pub generation: usize,
    /// Best whole fitness found so far
    pub best_fitness: f64,
    /// Average whole fitness as reported by the evaluator
    pub avg_fitness: f64,
}

impl GenerationRecord {
    /// Create a new record
    pub fn new(generation: usize, best_fitness: f64, avg_fitness: f64) -> Self {
        Self {
            generation,
            best_fitness,
            avg_fitness,
        }
    }
}

impl std::fmt::Display for GenerationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.generation, self.best_fitness, self.avg_fitness
        )
    }
}

/// Sink for per-generation progress
pub trait ProgressReporter {
    /// Receive the record of a completed generation
    fn report(&mut self, record: &GenerationRecord);
}

impl<F> ProgressReporter for F
where
    F: FnMut(&GenerationRecord),
{
    fn report(&mut self, record: &GenerationRecord) {
        self(record)
    }
}

/// Reporter that discards every record
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&mut self, _record: &GenerationRecord) {}
}

/// Reporter that emits each record as an `info` event
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&mut self, record: &GenerationRecord) {
        info!(
            generation = record.generation,
            best_fitness = record.best_fitness,
            avg_fitness = record.avg_fitness,
            "generation complete"
        );
    }
}

/// Reporter that keeps every record in memory
#[derive(Clone, Debug, Default)]
pub struct HistoryReporter {
    records: Vec<GenerationRecord>,
}

impl HistoryReporter {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Records received so far, in order
    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    /// Take ownership of the records
    pub fn into_records(self) -> Vec<GenerationRecord> {
        self.records
    }
}

impl ProgressReporter for HistoryReporter {
    fn report(&mut self, record: &GenerationRecord) {
        self.records.push(*record);
    }
}

/// Statistics collector for an entire evolution run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Record of each completed generation
    pub generations: Vec<GenerationRecord>,
    /// Total runtime in milliseconds
    pub total_runtime_ms: f64,
    /// Reason for termination
    pub termination_reason: Option<String>,
}

impl EvolutionStats {
    /// Create a new stats collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a generation
    pub fn record(&mut self, record: GenerationRecord) {
        self.generations.push(record);
    }

    /// Get the number of generations recorded
    pub fn num_generations(&self) -> usize {
        self.generations.len()
    }

    /// Lowest best fitness across all generations
    pub fn best_fitness(&self) -> Option<f64> {
        self.generations
            .iter()
            .map(|g| g.best_fitness)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Best fitness of the last recorded generation
    pub fn final_best_fitness(&self) -> Option<f64> {
        self.generations.last().map(|g| g.best_fitness)
    }

    /// Get the history of best fitness values
    pub fn best_fitness_history(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.best_fitness).collect()
    }

    /// Get the history of average fitness values
    pub fn avg_fitness_history(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.avg_fitness).collect()
    }

    /// Set the termination reason
    pub fn set_termination_reason(&mut self, reason: &str) {
        self.termination_reason = Some(reason.to_string());
    }

    /// Set the total runtime
    pub fn set_runtime(&mut self, duration: Duration) {
        self.total_runtime_ms = duration.as_secs_f64() * 1000.0;
    }

    /// Add to the total runtime
    pub fn add_runtime(&mut self, duration: Duration) {
        self.total_runtime_ms += duration.as_secs_f64() * 1000.0;
    }

    /// Get a summary of the evolution run
    pub fn summary(&self) -> String {
        let best = self.best_fitness().unwrap_or(f64::INFINITY);
        let final_best = self.final_best_fitness().unwrap_or(f64::INFINITY);

        format!(
            "Evolution Summary:\n\
             - Generations: {}\n\
             - Best fitness: {:.6}\n\
             - Final best: {:.6}\n\
             - Runtime: {:.2}ms\n\
             - Termination: {}",
            self.num_generations(),
            best,
            final_best,
            self.total_runtime_ms,
            self.termination_reason.as_deref().unwrap_or("unknown")
        )
    }
}

pub mod prelude {
    pub use super::{
        EvolutionStats, GenerationRecord, HistoryReporter, NoopReporter, ProgressReporter,
        TracingReporter,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_with(best: &[f64]) -> EvolutionStats {
        let mut stats = EvolutionStats::new();
        for (i, &b) in best.iter().enumerate() {
            stats.record(GenerationRecord::new(i + 1, b, b * 2.0));
        }
        stats
    }

    #[test]
    fn test_record_display() {
        let record = GenerationRecord::new(3, 1.5, 2.25);
        assert_eq!(record.to_string(), "3 1.5 2.25");
    }

    #[test]
    fn test_history_reporter_keeps_order() {
        let mut reporter = HistoryReporter::new();
        reporter.report(&GenerationRecord::new(1, 4.0, 5.0));
        reporter.report(&GenerationRecord::new(2, 3.0, 4.0));

        let generations: Vec<_> = reporter.records().iter().map(|r| r.generation).collect();
        assert_eq!(generations, vec![1, 2]);
    }

    #[test]
    fn test_closure_reporter() {
        let mut seen = Vec::new();
        {
            let mut reporter = |r: &GenerationRecord| seen.push(r.generation);
            reporter.report(&GenerationRecord::new(7, 0.0, 0.0));
        }
        assert_eq!(seen, vec![7]);
    }

    #[test]
    fn test_evolution_stats_best_is_minimum() {
        let stats = stats_with(&[5.0, 2.0, 3.0]);
        assert_eq!(stats.num_generations(), 3);
        assert_eq!(stats.best_fitness(), Some(2.0));
        assert_eq!(stats.final_best_fitness(), Some(3.0));
    }

    #[test]
    fn test_evolution_stats_history() {
        let stats = stats_with(&[3.0, 2.0, 1.0]);
        assert_eq!(stats.best_fitness_history(), vec![3.0, 2.0, 1.0]);
        assert_eq!(stats.avg_fitness_history(), vec![6.0, 4.0, 2.0]);
    }

    #[test]
    fn test_evolution_stats_summary() {
        let mut stats = stats_with(&[4.0]);
        stats.set_termination_reason("Target fitness reached");
        stats.set_runtime(Duration::from_millis(1234));

        let summary = stats.summary();
        assert!(summary.contains("Generations: 1"));
        assert!(summary.contains("Best fitness: 4"));
        assert!(summary.contains("Target fitness reached"));
    }

    #[test]
    fn test_evolution_stats_serde() {
        let stats = stats_with(&[1.0, 0.5]);
        let json = serde_json::to_string(&stats).unwrap();
        let back: EvolutionStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back.generations, stats.generations);
    }
}
