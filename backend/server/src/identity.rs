use std::{convert::Infallible, sync::Arc};

use axum::{extract::FromRequestParts, http::request::Parts};
use ledger::UserId;

use crate::{error::AppError, state::State};

/// Caller identity as forwarded by the upstream auth proxy.
///
/// A missing, blank or non-UTF-8 header is an anonymous caller, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(pub Option<UserId>);

impl Identity {
    pub fn user(&self) -> Option<&UserId> {
        self.0.as_ref()
    }

    pub fn require(self) -> Result<UserId, AppError> {
        self.0.ok_or(AppError::Unauthorized)
    }
}

impl FromRequestParts<Arc<State>> for Identity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<State>,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(&state.config.identity_header)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| UserId::new(value.trim()).ok());

        Ok(Identity(user))
    }
}
