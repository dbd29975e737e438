//! Error types for commands and configuration
//!
//! The simulation itself never fails; only inbound commands that make no
//! sense in the current state, and configuration loading, are rejected.

use thiserror::Error;

use crate::session::GamePhase;
use crate::sim::{UpgradeId, WeaponId};

/// Rejection of an inbound session command
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("command requires an active round (phase is {0:?})")]
    NotPlaying(GamePhase),
    #[error("round is paused")]
    Paused,
    #[error("an upgrade choice must be resolved first")]
    ChoicePending,
    #[error("weapon {0:?} is not unlocked in this profile")]
    WeaponLocked(WeaponId),
    #[error("no upgrade choice is pending")]
    NoUpgradePending,
    #[error("upgrade {0:?} was not offered")]
    UpgradeNotOffered(UpgradeId),
    #[error("hero power charge is {0:.0}/100")]
    PowerNotCharged(f32),
    #[error("dash ready in {0:.2}s")]
    DashNotReady(f32),
}

/// Failure loading [`crate::Settings`]
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// An identifier string did not match any hero, weapon or upgrade
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} id `{id}`")]
pub struct UnknownId {
    pub kind: &'static str,
    pub id: String,
}
