//! Run and ensemble reports.

use crate::SimulatorError;
use fastsir_types::{MacroState, Transmission};
use hdrhistogram::Histogram;
use serde::Serialize;

/// Collects statistics while a run evolves.
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    samples: Vec<MacroState>,
    peak_prevalence: f64,
    peak_time: f64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
            peak_prevalence: 0.0,
            peak_time: 0.0,
        }
    }

    /// Record a regular sample.
    pub fn record_sample(&mut self, state: MacroState) {
        self.observe(&state);
        self.samples.push(state);
    }

    /// Account for a state without keeping it as a sample.
    pub fn observe(&mut self, state: &MacroState) {
        let prevalence = state.prevalence();
        if prevalence > self.peak_prevalence {
            self.peak_prevalence = prevalence;
            self.peak_time = state.time;
        }
    }

    /// Produce the final report.
    pub fn finish(self, run: RunDetails) -> SimulationReport {
        let max_generation = run
            .transmission_tree
            .iter()
            .map(|record| record.infectee_generation().0)
            .max()
            .unwrap_or(0);
        SimulationReport {
            seed: run.seed,
            model: run.model.to_string(),
            nodes: run.final_state.total(),
            final_size: run.final_state.infected + run.final_state.recovered,
            attack_rate: run.final_state.attack_rate(),
            final_state: run.final_state,
            peak_prevalence: self.peak_prevalence,
            peak_time: self.peak_time,
            extinct: run.final_state.infected == 0,
            steps: run.steps,
            transmissions: run.transmission_tree.len(),
            max_generation,
            samples: self.samples,
            macro_states: run.macro_states,
            transmission_tree: run.transmission_tree,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// What the engine hands over at the end of a run.
#[derive(Debug, Clone)]
pub struct RunDetails {
    pub seed: u64,
    pub model: &'static str,
    pub final_state: MacroState,
    pub steps: u64,
    pub macro_states: Vec<MacroState>,
    pub transmission_tree: Vec<Transmission>,
}

/// Outcome of a single run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub seed: u64,
    pub model: String,
    pub nodes: usize,
    pub final_state: MacroState,
    /// Nodes ever infected.
    pub final_size: usize,
    pub attack_rate: f64,
    pub peak_prevalence: f64,
    pub peak_time: f64,
    /// No node infected at the end of the run.
    pub extinct: bool,
    pub steps: u64,
    pub transmissions: usize,
    /// Deepest generation in the transmission tree; zero when not recorded.
    pub max_generation: u32,
    /// Macro-state on the regular sampling grid.
    pub samples: Vec<MacroState>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub macro_states: Vec<MacroState>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transmission_tree: Vec<Transmission>,
}

impl SimulationReport {
    /// Compact view kept by ensembles.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            seed: self.seed,
            final_size: self.final_size,
            attack_rate: self.attack_rate,
            peak_prevalence: self.peak_prevalence,
            peak_time: self.peak_time,
            extinct: self.extinct,
            transmissions: self.transmissions,
        }
    }

    /// Print a human-readable summary.
    pub fn print_summary(&self) {
        println!("\n=== Simulation Report ({}) ===", self.model);
        println!("Seed:            {}", self.seed);
        println!("Nodes:           {}", self.nodes);
        println!(
            "Final size:      {} ({:.2}%)",
            self.final_size,
            self.attack_rate * 100.0
        );
        println!(
            "Peak prevalence: {:.4} at t = {:.3}",
            self.peak_prevalence, self.peak_time
        );
        println!("Extinct:         {}", self.extinct);
        println!("Steps:           {}", self.steps);
        if self.transmissions > 0 {
            println!(
                "Transmissions:   {} (max generation {})",
                self.transmissions, self.max_generation
            );
        }
    }
}

/// Per-run figures kept in an ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub final_size: usize,
    pub attack_rate: f64,
    pub peak_prevalence: f64,
    pub peak_time: f64,
    pub extinct: bool,
    pub transmissions: usize,
}

/// Distribution of final sizes across runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinalSizeDistribution {
    pub min: u64,
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
    pub max: u64,
}

/// Outcome of independent runs sharing one configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleReport {
    pub runs: Vec<RunSummary>,
    pub mean_final_size: f64,
    pub mean_attack_rate: f64,
    pub mean_peak_prevalence: f64,
    /// Fraction of runs with no infected node left.
    pub extinction_fraction: f64,
    pub final_size_distribution: FinalSizeDistribution,
    /// `(time, mean prevalence)` over the sampling grid. Runs that stopped
    /// early contribute their last sample.
    pub mean_prevalence: Vec<(f64, f64)>,
}

impl EnsembleReport {
    /// Aggregate finished runs. `reports` must not be empty.
    pub fn from_reports(reports: &[SimulationReport]) -> Result<Self, SimulatorError> {
        if reports.is_empty() {
            return Err(SimulatorError::Metrics("no runs to aggregate".to_string()));
        }
        let count = reports.len() as f64;
        let mean = |value: fn(&SimulationReport) -> f64| {
            reports.iter().map(value).sum::<f64>() / count
        };

        let mut histogram =
            Histogram::<u64>::new(3).map_err(|e| SimulatorError::Metrics(e.to_string()))?;
        for report in reports {
            histogram
                .record(report.final_size as u64)
                .map_err(|e| SimulatorError::Metrics(e.to_string()))?;
        }

        Ok(Self {
            runs: reports.iter().map(SimulationReport::summary).collect(),
            mean_final_size: mean(|report| report.final_size as f64),
            mean_attack_rate: mean(|report| report.attack_rate),
            mean_peak_prevalence: mean(|report| report.peak_prevalence),
            extinction_fraction: mean(|report| if report.extinct { 1.0 } else { 0.0 }),
            final_size_distribution: FinalSizeDistribution {
                min: histogram.min(),
                p50: histogram.value_at_quantile(0.5),
                p90: histogram.value_at_quantile(0.9),
                p99: histogram.value_at_quantile(0.99),
                max: histogram.max(),
            },
            mean_prevalence: mean_prevalence(reports),
        })
    }

    /// Print a human-readable summary.
    pub fn print_summary(&self) {
        let distribution = &self.final_size_distribution;
        println!("\n=== Ensemble Report ({} runs) ===", self.runs.len());
        println!("Mean final size:      {:.2}", self.mean_final_size);
        println!("Mean attack rate:     {:.4}", self.mean_attack_rate);
        println!("Mean peak prevalence: {:.4}", self.mean_peak_prevalence);
        println!("Extinct runs:         {:.1}%", self.extinction_fraction * 100.0);
        println!(
            "Final size:           min {} | p50 {} | p90 {} | p99 {} | max {}",
            distribution.min, distribution.p50, distribution.p90, distribution.p99, distribution.max
        );
    }
}

fn mean_prevalence(reports: &[SimulationReport]) -> Vec<(f64, f64)> {
    let longest = reports
        .iter()
        .max_by_key(|report| report.samples.len())
        .map(|report| report.samples.as_slice())
        .unwrap_or(&[]);

    longest
        .iter()
        .enumerate()
        .map(|(index, sample)| {
            let total: f64 = reports
                .iter()
                .filter_map(|report| report.samples.get(index).or(report.samples.last()))
                .map(MacroState::prevalence)
                .sum();
            (sample.time, total / reports.len() as f64)
        })
        .collect()
}
