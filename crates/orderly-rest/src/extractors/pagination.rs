//! Pagination extractor.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use orderly_core::{ListRange, OrderlyError};
use serde::Deserialize;

/// Raw `take`/`skip` query parameters.
///
/// Kept as text so malformed numbers surface as parse errors naming the
/// parameter instead of a generic query rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    #[serde(default)]
    pub take: Option<String>,
    #[serde(default)]
    pub skip: Option<String>,
}

impl TryFrom<PaginationQuery> for ListRange {
    type Error = OrderlyError;

    fn try_from(query: PaginationQuery) -> Result<Self, Self::Error> {
        ListRange::parse(query.take.as_deref(), query.skip.as_deref())
    }
}

/// Extracts a [`ListRange`] from the query string.
#[derive(Debug, Clone, Copy)]
pub struct Pagination(pub ListRange);

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PaginationQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError(OrderlyError::bind(rejection.body_text())))?;

        Ok(Self(ListRange::try_from(query)?))
    }
}
