//! Path id extractor.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use orderly_core::{OrderlyError, Resource};

/// Extracts the `:id` path segment as the resource's typed id.
///
/// Ids are unsigned 32-bit integers on the wire.
#[derive(Debug)]
pub struct ResourceId<R: Resource>(pub R::Id);

/// Parses a textual id.
pub fn parse_id<R: Resource>(raw: &str) -> Result<R::Id, OrderlyError> {
    raw.parse::<u32>()
        .map(R::Id::from)
        .map_err(|_| OrderlyError::parse("id", raw))
}

#[async_trait]
impl<R, S> FromRequestParts<S> for ResourceId<R>
where
    R: Resource,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError(OrderlyError::parse("id", rejection.body_text())))?;

        Ok(Self(parse_id::<R>(&raw)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderly_core::{Order, OrderId};

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id::<Order>("42").unwrap(), OrderId(42));
        assert!(matches!(parse_id::<Order>("-1"), Err(OrderlyError::Parse { .. })));
        assert!(matches!(parse_id::<Order>("abc"), Err(OrderlyError::Parse { .. })));
    }
}
