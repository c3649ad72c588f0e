//! # Reaction Ledger
//!
//! Recipes and the per-user reactions attached to them.
//!
//! ## Model
//!
//! - Every recipe carries a ledger: an ordered list of (user, reaction) entries
//!   plus denormalized **likes**, **dislikes** and **neutral** counts
//! - At most one entry per user
//! - Each count equals the number of entries of that kind, after every update
//!
//! ## Updates
//!
//! A reaction request either adds an entry, switches an existing entry to a
//! new kind, or removes it when the same kind is sent twice (toggle-off).
//! Counts are decremented with a floor check and the whole ledger is verified
//! before the change is committed, so a diverged ledger surfaces as
//! [`LedgerError`] instead of a negative count.
//!
//! Persistence and per-recipe serialization live in the server crate. This
//! crate is pure and does no I/O.

pub mod error;
pub mod projection;
pub mod reaction;
pub mod recipe;

pub use error::LedgerError;
pub use projection::{
    Listing, Order, Query, RECOMMENDATION_LIMIT, RecipeFilter, RecipeView, UserReaction,
};
pub use reaction::{ReactionCounts, ReactionEntry, ReactionKind};
pub use recipe::{Ledger, NewRecipe, Recipe, RecipeId, UserId};
