//! Domain model (ids, topics, pending rolls, chat events, actors, errors).

pub mod actor;
pub mod errors;
pub mod event;
pub mod ids;
pub mod roll;
pub mod topic;

pub use actor::{Actor, ActorItem};
pub use errors::TrackerError;
pub use event::{ChatEvent, EventFlags, RollReport, Speaker};
pub use ids::{Id, IdMarker, ParseIdError, RollId};
pub use roll::{Continuation, PendingRoll, RollMetadata, RollPhase};
pub use topic::{RollTopic, UnknownTopic};
