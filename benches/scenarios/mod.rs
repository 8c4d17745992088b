//! Whole-engine scenario benchmarks.
//!
//! These push notes through `PolySynth` the way a player would and measure
//! the cost of one render block.

mod voices;

pub use voices::bench_voices;
