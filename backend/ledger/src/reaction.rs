use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::LedgerError, recipe::UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
    Neutral,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 3] = [
        ReactionKind::Like,
        ReactionKind::Dislike,
        ReactionKind::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Dislike => "dislike",
            ReactionKind::Neutral => "neutral",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(ReactionKind::Like),
            "dislike" => Ok(ReactionKind::Dislike),
            "neutral" => Ok(ReactionKind::Neutral),
            other => Err(LedgerError::InvalidReaction(other.to_string())),
        }
    }
}

/// Aggregate tallies, serialized with the pluralized keys clients expect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCounts {
    pub likes: u32,
    pub dislikes: u32,
    pub neutral: u32,
}

impl ReactionCounts {
    pub fn get(&self, kind: ReactionKind) -> u32 {
        match kind {
            ReactionKind::Like => self.likes,
            ReactionKind::Dislike => self.dislikes,
            ReactionKind::Neutral => self.neutral,
        }
    }

    fn slot_mut(&mut self, kind: ReactionKind) -> &mut u32 {
        match kind {
            ReactionKind::Like => &mut self.likes,
            ReactionKind::Dislike => &mut self.dislikes,
            ReactionKind::Neutral => &mut self.neutral,
        }
    }

    pub(crate) fn increment(&mut self, kind: ReactionKind) -> Result<(), LedgerError> {
        let slot = self.slot_mut(kind);
        *slot = slot.checked_add(1).ok_or(LedgerError::Overflow(kind))?;

        Ok(())
    }

    pub(crate) fn decrement(&mut self, kind: ReactionKind) -> Result<(), LedgerError> {
        let slot = self.slot_mut(kind);
        *slot = slot.checked_sub(1).ok_or(LedgerError::Underflow(kind))?;

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEntry {
    pub user: UserId,
    pub reaction: ReactionKind,
}
