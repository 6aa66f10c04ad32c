//! # Skirmish Core
//!
//! Decision core for an autonomous combat bot in a fixed-size arena.
//!
//! The crate contains **only** deterministic decision logic:
//! - No rendering
//! - No IO (configuration loading aside)
//! - No system randomness
//! - No floating-point math (uses fixed-point)
//!
//! The arena engine itself - tick scheduling, pathing, damage resolution,
//! production - lives behind the [`arena::Arena`] trait. The bot is invoked
//! once per simulation tick via [`bot::Bot::tick`] and decides what to
//! produce, when to release the staging squad, and what every active unit
//! does this tick.
//!
//! ## Crate Structure
//!
//! - [`arena`] - the engine collaborator boundary
//! - [`state`] - bot-owned simulation state
//! - [`policy`] - pluggable production-and-role policy
//! - [`bot`] - the per-tick driver
//! - [`math`] - fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod arena;
pub mod bot;
pub mod combat;
pub mod config;
pub mod economy;
pub mod error;
pub mod math;
pub mod policy;
pub mod snapshot;
pub mod spawner;
pub mod squad;
pub mod state;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::arena::{
        Arena, BodyPart, ContainerView, FacilityView, StructureId, Target, UnitId, UnitView,
    };
    pub use crate::bot::{Bot, TickReport};
    pub use crate::config::BotConfig;
    pub use crate::error::{ActionError, SpawnError};
    pub use crate::math::{Fixed, Vec2Fixed};
    pub use crate::policy::{SpawnOrder, SpawnPolicy};
    pub use crate::state::{BotState, Role, UnitMeta};
}
