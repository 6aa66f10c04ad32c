//! # Skirmish Headless
//!
//! Runs the combat bot against the sandbox arena without a platform,
//! for playtesting, CI verification and policy comparison. Match
//! reports are serde structs so CI can diff them as JSON.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod runner;
