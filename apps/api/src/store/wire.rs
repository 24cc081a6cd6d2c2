//! Wire representation of profile records.
//!
//! The store encodes "no value" for `verified`/`reviewed` as an empty
//! sequence and a present value as a one-element sequence. That encoding is
//! wrapped/unwrapped here, in both directions, and nowhere else.

use serde::{Deserialize, Serialize};

use crate::models::profile::{Position, UserProfile};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirePosition {
    pub company: String,
    pub role: String,
    pub duration: u64,
    pub verified: Vec<bool>,
    pub reviewed: Vec<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProfile {
    pub name: String,
    pub skill_level: String,
    pub positions: Vec<WirePosition>,
}

fn wrap(value: Option<bool>) -> Vec<bool> {
    match value {
        Some(v) => vec![v],
        None => vec![],
    }
}

fn unwrap(sequence: &[bool]) -> Option<bool> {
    sequence.first().copied()
}

impl From<&Position> for WirePosition {
    fn from(position: &Position) -> Self {
        WirePosition {
            company: position.company.clone(),
            role: position.role.clone(),
            duration: position.duration,
            verified: wrap(position.verified),
            reviewed: wrap(position.reviewed),
        }
    }
}

impl From<WirePosition> for Position {
    fn from(wire: WirePosition) -> Self {
        Position {
            verified: unwrap(&wire.verified),
            reviewed: unwrap(&wire.reviewed),
            company: wire.company,
            role: wire.role,
            duration: wire.duration,
        }
    }
}

impl From<WireProfile> for UserProfile {
    fn from(wire: WireProfile) -> Self {
        UserProfile {
            name: wire.name,
            skill_level: wire.skill_level,
            positions: wire.positions.into_iter().map(Position::from).collect(),
        }
    }
}
