//! jamboree-core
//!
//! Skill roll tracking for travel activities (hunting, foraging, cooking)
//! on a virtual tabletop: start a roll in the host's own dice roller, then
//! learn whether it succeeded by watching the chat stream.
//!
//! # Modules
//! - **domain**: ids, topic, roll, event, actor, errors
//! - **ports**: host boundary (Clock, IdGenerator, FlagStore, Notifier, RollHost, SkillProvider)
//! - **correlator**: chat markup to `RollReport`
//! - **tracker**: pending rolls, matching, timeouts and sweeping
//! - **systems**: per-ruleset SkillProviders and the SystemRegistry
//! - **app**: builder, check service, gc loop, runtime
//! - **impls**: in-process port implementations for tests and the CLI
//! - **config**: TrackerConfig

pub mod app;
pub mod config;
pub mod correlator;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod systems;
pub mod tracker;

pub use crate::app::{SkillCheckService, TrackerBuilder, TrackerRuntime};
pub use crate::config::TrackerConfig;
pub use crate::domain::{ChatEvent, RollId, RollTopic, TrackerError};
pub use crate::tracker::SkillRollTracker;
