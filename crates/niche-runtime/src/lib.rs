//! # Niche Runtime
//!
//! Model management, the step loop, and everything built on top of it.
//!
//! The runtime owns the world: the resource field, the toroidal spatial
//! index and the registry of agents. It runs the step loop, collects the
//! per-step reporters, and drives longer experiments such as the external
//! evolutionary loop and recharge-rate sweeps.

pub mod environment;
pub mod grid;
pub mod config;
pub mod model;
pub mod model_builder;
pub mod metrics;
pub mod evolution;
pub mod sweep;
pub mod export;
pub mod prelude;
