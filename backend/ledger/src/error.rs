use thiserror::Error;

use crate::{reaction::ReactionKind, recipe::UserId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid reaction: {0}")]
    InvalidReaction(String),

    #[error("Invalid recipe id: {0}")]
    InvalidRecipeId(String),

    #[error("Invalid user id")]
    InvalidUser,

    #[error("Field `{0}` must not be empty")]
    EmptyField(&'static str),

    #[error("{0} count would drop below zero")]
    Underflow(ReactionKind),

    #[error("{0} count overflowed")]
    Overflow(ReactionKind),

    #[error("{kind} count is {recorded} but {counted} entries exist")]
    CountMismatch {
        kind: ReactionKind,
        recorded: u32,
        counted: u32,
    },

    #[error("User {0} has more than one reaction")]
    DuplicateUser(UserId),
}

impl LedgerError {
    /// Errors caused by caller input rather than by stored state.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidReaction(_)
                | LedgerError::InvalidRecipeId(_)
                | LedgerError::InvalidUser
                | LedgerError::EmptyField(_)
        )
    }
}
