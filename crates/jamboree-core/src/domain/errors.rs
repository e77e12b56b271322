use thiserror::Error;

/// Errors surfaced by the tracker's setup paths and its ports.
///
/// Nothing on the event / timeout / GC paths returns these to a caller:
/// there they are logged and swallowed.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("flag store: {0}")]
    FlagStore(String),

    #[error("host: {0}")]
    Host(String),

    #[error("{actor} has no skill named {skill}")]
    UnknownSkill { actor: String, skill: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
