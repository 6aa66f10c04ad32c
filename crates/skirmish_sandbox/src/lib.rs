//! # Skirmish Sandbox
//!
//! Shared sandbox utilities for all crates:
//! - A deterministic stand-in arena engine ([`arena::SandboxArena`])
//! - Scenario fixtures
//! - Determinism test harness
//! - Property-based testing strategies
//!
//! The real arena engine lives on the game platform; off-platform, the
//! sandbox is the only engine there is. Tests drive the decision core
//! against it and assert on the exact commands issued; the headless
//! runner plays whole matches on it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod arena;
pub mod determinism;
pub mod fixtures;

/// Re-export proptest for convenience.
pub use proptest;
