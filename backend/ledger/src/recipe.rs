use std::{collections::HashSet, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::LedgerError,
    reaction::{ReactionCounts, ReactionEntry, ReactionKind},
};

/// Opaque identity handed over by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Result<Self, LedgerError> {
        let id = id.into();

        if id.trim().is_empty() {
            return Err(LedgerError::InvalidUser);
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(Uuid);

impl RecipeId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecipeId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| LedgerError::InvalidRecipeId(s.to_string()))
    }
}

/// Reaction list and the counts derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    #[serde(default)]
    reactions: ReactionCounts,
    #[serde(default)]
    user_reactions: Vec<ReactionEntry>,
}

impl Ledger {
    #[cfg(test)]
    pub(crate) fn from_parts(
        reactions: ReactionCounts,
        user_reactions: Vec<ReactionEntry>,
    ) -> Self {
        Self {
            reactions,
            user_reactions,
        }
    }

    pub fn counts(&self) -> ReactionCounts {
        self.reactions
    }

    /// Reaction entries in the order they were first recorded.
    pub fn entries(&self) -> &[ReactionEntry] {
        &self.user_reactions
    }

    pub fn reaction_of(&self, user: &UserId) -> Option<ReactionKind> {
        self.user_reactions
            .iter()
            .find(|entry| &entry.user == user)
            .map(|entry| entry.reaction)
    }

    /// Applies `kind` for `user` and returns the new counts.
    ///
    /// - no entry: append it and bump its count
    /// - same kind as before: drop the entry (toggle-off)
    /// - different kind: move the entry from the old count to the new one
    ///
    /// The ledger is only modified when the result passes [`Ledger::verify`].
    pub fn apply(
        &mut self,
        user: &UserId,
        kind: ReactionKind,
    ) -> Result<ReactionCounts, LedgerError> {
        let mut next = self.clone();

        match next.user_reactions.iter().position(|entry| &entry.user == user) {
            None => {
                next.user_reactions.push(ReactionEntry {
                    user: user.clone(),
                    reaction: kind,
                });
                next.reactions.increment(kind)?;
            }
            Some(index) => {
                let previous = next.user_reactions[index].reaction;
                next.reactions.decrement(previous)?;

                if previous == kind {
                    next.user_reactions.remove(index);
                } else {
                    next.user_reactions[index].reaction = kind;
                    next.reactions.increment(kind)?;
                }
            }
        }

        next.verify()?;
        *self = next;

        Ok(self.reactions)
    }

    /// Checks one entry per user and that every count matches its entries.
    pub fn verify(&self) -> Result<(), LedgerError> {
        let mut seen = HashSet::with_capacity(self.user_reactions.len());
        let mut tally = ReactionCounts::default();

        for entry in &self.user_reactions {
            if !seen.insert(&entry.user) {
                return Err(LedgerError::DuplicateUser(entry.user.clone()));
            }

            tally.increment(entry.reaction)?;
        }

        for kind in ReactionKind::ALL {
            let (recorded, counted) = (self.reactions.get(kind), tally.get(kind));

            if recorded != counted {
                return Err(LedgerError::CountMismatch {
                    kind,
                    recorded,
                    counted,
                });
            }
        }

        Ok(())
    }
}

/// Submission payload. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub image: String,
    pub recipe: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub description: String,
    pub image: String,
    pub recipe: String,
    #[serde(flatten)]
    pub ledger: Ledger,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub revision: u64,
}

impl Recipe {
    pub fn create(draft: NewRecipe, date: DateTime<Utc>) -> Result<Self, LedgerError> {
        Ok(Self {
            id: RecipeId::generate(),
            title: required("title", draft.title)?,
            description: required("description", draft.description)?,
            image: required("image", draft.image)?,
            recipe: required("recipe", draft.recipe)?,
            ledger: Ledger::default(),
            date,
            revision: 0,
        })
    }

    pub fn counts(&self) -> ReactionCounts {
        self.ledger.counts()
    }

    pub fn reaction_of(&self, user: &UserId) -> Option<ReactionKind> {
        self.ledger.reaction_of(user)
    }

    pub fn react(
        &mut self,
        user: &UserId,
        kind: ReactionKind,
    ) -> Result<ReactionCounts, LedgerError> {
        self.ledger.apply(user, kind)
    }
}

fn required(field: &'static str, value: String) -> Result<String, LedgerError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(LedgerError::EmptyField(field));
    }

    Ok(trimmed.to_string())
}
