//! Seeded contagion engine.
//!
//! This crate runs one SIR process on a fixed network. Given the same seed,
//! network and event generator it produces identical results every run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Contagion<G>                         │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     G: EventGenerator                              │ │
//! │  │     lifetime() → time to next batch                │ │
//! │  │     next_step() → Vec<Event>                       │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Transmission tree (infector drawn per event)   │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Population: states + infected neighbors        │ │
//! │  │     updated through G::infect / G::recover         │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Macro-state snapshot                           │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod contagion;

pub use contagion::{Contagion, ContagionStats};
