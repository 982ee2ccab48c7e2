//! JSON payload extractor.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use orderly_core::OrderlyError;
use serde::de::DeserializeOwned;

/// JSON body extractor whose rejection is a bind error in the API envelope.
///
/// Schema validation happens in the service layer, after the payload has
/// been applied to its entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError(OrderlyError::bind(rejection.body_text())))?;

        Ok(Payload(value))
    }
}
