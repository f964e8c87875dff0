//! Seeded runs are reproducible and independent of each other.

use fastsir_models::{annealed_sir, continuous_sir, discrete_sir, ContinuousSir};
use fastsir_test_helpers::{complete, ring};
use fastsir_types::{MacroState, Transmission};

fn exact_run(seed: u64) -> (Vec<MacroState>, Vec<Transmission>) {
    let mut sir: ContinuousSir = continuous_sir(&ring(200), 1.0, vec![0.0, 1.2, 2.4]).unwrap();
    sir.seed(seed);
    sir.infect_fraction(0.05).unwrap();
    sir.evolve(50.0, true, true).unwrap();
    (
        sir.macro_state_vector().to_vec(),
        sir.transmission_tree().to_vec(),
    )
}

#[test]
fn test_exact_same_seed_same_trajectory() {
    assert_eq!(exact_run(7), exact_run(7));
    assert_ne!(exact_run(7), exact_run(8));
}

#[test]
fn test_discrete_same_seed_same_trajectory() {
    let run = |seed| {
        let probabilities = (0..=9).map(|k| 1.0 - 0.9f64.powi(k)).collect();
        let mut sir = discrete_sir(&complete(10), 0.2, probabilities).unwrap();
        sir.seed(seed);
        sir.infect_node_set([0]).unwrap();
        sir.evolve(30.0, true, true).unwrap();
        (
            sir.macro_state_vector().to_vec(),
            sir.transmission_tree().to_vec(),
        )
    };
    assert_eq!(run(3), run(3));
}

#[test]
fn test_annealed_same_seed_same_trajectory() {
    let run = |seed| {
        let mut sir = annealed_sir(300, 3, 1.0, vec![0.0, 1.0, 2.0, 3.0]).unwrap();
        sir.seed(seed);
        sir.infect_fraction(0.01).unwrap();
        sir.evolve(20.0, true, true).unwrap();
        sir.macro_state_vector().to_vec()
    };
    assert_eq!(run(11), run(11));
}

#[test]
fn test_reseed_after_reset_replays() {
    let mut sir = continuous_sir(&ring(100), 1.0, vec![0.0, 1.5, 3.0]).unwrap();
    sir.seed(99);
    sir.infect_fraction(0.1).unwrap();
    sir.evolve(10.0, false, true).unwrap();
    let first = sir.macro_state_vector().to_vec();

    sir.reset().unwrap();
    sir.seed(99);
    sir.infect_fraction(0.1).unwrap();
    sir.evolve(10.0, false, true).unwrap();

    assert_eq!(sir.macro_state_vector(), first.as_slice());
}
