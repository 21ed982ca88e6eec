//! Error types for the movement core.
//!
//! Command errors describe why a command was refused. The command's task
//! has always been canceled by the time one is returned, so an issuer that
//! only watches its [`TaskHandle`](crate::task::TaskHandle) loses nothing by
//! ignoring them.

use std::path::PathBuf;

use crate::actor::ActorId;

/// Reasons a movement command was refused.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MovementError {
    /// The command carried a non-finite or out-of-range parameter.
    #[error("invalid command: {0}")]
    InvalidCommand(&'static str),

    /// The actor has no navigation agent right now.
    #[error("actor {0} has no navigation agent")]
    NavigationUnavailable(ActorId),

    /// The navigation agent could not plan a path for the command.
    #[error("no path for actor {actor} toward {target:?}")]
    NoPath {
        /// Actor that issued the command
        actor: ActorId,
        /// Requested destination or retreat origin
        target: glam::Vec3,
    },

    /// The animation controller refused to play the sequence.
    #[error("sequence {sequence:?} could not be played")]
    SequenceUnavailable {
        /// Requested sequence name
        sequence: String,
    },

    /// `retarget` was called without an active targeted walk.
    #[error("actor {0} is not walking toward a target")]
    NotWalking(ActorId),
}

/// Errors raised while loading a [`MovementConfig`](crate::config::MovementConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON for the config schema.
    #[error("malformed movement config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("invalid movement config: {0}")]
    Invalid(&'static str),
}
