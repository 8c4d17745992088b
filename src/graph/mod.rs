//! Building blocks for the per-voice signal graph.
//!
//! Graph nodes wrap the low-level DSP primitives with what a voice needs on
//! top: a shared sample clock, timestamped start/stop, and schedulable gain
//! coefficients. Nodes are owned by value, so a graph is torn down by dropping
//! the struct that holds it.

/// Lowpass node over the state-variable filter.
pub mod filter;
/// Gain stage with a scheduled coefficient and optional audio-rate input.
pub mod gain;
/// Core trait and render context shared by all graph nodes.
pub mod node;
/// Oscillators with scheduled start, hard stop and completion.
pub mod oscillator;

pub use node::{GraphNode, RenderCtx};
