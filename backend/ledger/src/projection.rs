//! Read-side views derived from the current ledgers.

use serde::Serialize;

use crate::{
    reaction::ReactionKind,
    recipe::{Recipe, UserId},
};

pub const RECOMMENDATION_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecipeFilter {
    #[default]
    All,
    ReactedBy(UserId),
}

impl RecipeFilter {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        match self {
            RecipeFilter::All => true,
            RecipeFilter::ReactedBy(user) => recipe.reaction_of(user).is_some(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Oldest first, ties by id.
    #[default]
    DateAscending,
    /// Most liked first. Stable over the date ordering.
    LikesDescending,
}

/// Filter, sort and limit understood by every store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    pub filter: RecipeFilter,
    pub order: Order,
    pub limit: Option<usize>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn recommendations() -> Self {
        Self {
            filter: RecipeFilter::All,
            order: Order::LikesDescending,
            limit: Some(RECOMMENDATION_LIMIT),
        }
    }

    pub fn reacted_by(user: UserId) -> Self {
        Self {
            filter: RecipeFilter::ReactedBy(user),
            ..Self::default()
        }
    }

    /// Runs the query over an unordered set of recipes.
    pub fn apply(&self, recipes: impl IntoIterator<Item = Recipe>) -> Vec<Recipe> {
        let mut matched: Vec<Recipe> = recipes
            .into_iter()
            .filter(|recipe| self.filter.matches(recipe))
            .collect();

        matched.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

        if self.order == Order::LikesDescending {
            matched.sort_by(|a, b| b.counts().likes.cmp(&a.counts().likes));
        }

        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }

        matched
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeView {
    #[serde(flatten)]
    pub recipe: Recipe,
    #[serde(rename = "userReaction")]
    pub user_reaction: Option<ReactionKind>,
}

/// Recipe listing. Anonymous listings carry no `userReaction` field at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Listing {
    Anonymous(Vec<Recipe>),
    Personal(Vec<RecipeView>),
}

impl Listing {
    pub fn new(recipes: Vec<Recipe>, user: Option<&UserId>) -> Self {
        match user {
            None => Listing::Anonymous(recipes),
            Some(user) => Listing::Personal(
                recipes
                    .into_iter()
                    .map(|recipe| RecipeView {
                        user_reaction: recipe.reaction_of(user),
                        recipe,
                    })
                    .collect(),
            ),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Listing::Anonymous(recipes) => recipes.len(),
            Listing::Personal(views) => views.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserReaction {
    pub title: String,
    pub reaction: ReactionKind,
}

impl UserReaction {
    pub fn collect(recipes: &[Recipe], user: &UserId) -> Vec<Self> {
        recipes
            .iter()
            .filter_map(|recipe| {
                recipe.reaction_of(user).map(|reaction| UserReaction {
                    title: recipe.title.clone(),
                    reaction,
                })
            })
            .collect()
    }
}
