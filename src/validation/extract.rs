//! JSON body extraction with validation.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::errors::Fault;
use crate::validation::Validate;

/// A JSON body that parsed and passed [`Validate`].
///
/// Parse failures become 400/413/415 faults; validation failures become
/// validation faults. Handlers never see a raw axum rejection.
#[derive(Debug, Clone)]
pub struct Valid<T>(pub T);

impl<T, S> FromRequest<S> for Valid<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Fault;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_fault)?;
        value.validate()?;
        Ok(Valid(value))
    }
}

fn rejection_to_fault(rejection: JsonRejection) -> Fault {
    Fault::bad_request(rejection.status(), rejection.body_text())
}
