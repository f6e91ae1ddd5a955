//! Ownership gate
//!
//! Runs after `auth::middleware::require_auth`. Resolves the `{id}` path
//! segment to a restaurant owned by the caller and hands it to the
//! handler as [`OwnedRestaurant`], so the row is read once per request.

use axum::extract::{FromRequestParts, Path, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use auth::AuthContext;
use kernel::id::RestaurantId;

use crate::application::AuthorizeOwnerUseCase;
use crate::domain::entity::Restaurant;
use crate::domain::repository::RestaurantRepository;
use crate::error::CatalogError;
use crate::presentation::handlers::CatalogAppState;

/// Restaurant the authenticated caller owns
#[derive(Debug, Clone)]
pub struct OwnedRestaurant(pub Restaurant);

/// Reject unless the caller owns the restaurant named in the path
pub async fn require_owner<R>(
    State(state): State<CatalogAppState<R>>,
    Path(restaurant_id): Path<RestaurantId>,
    auth: AuthContext,
    mut req: Request,
    next: Next,
) -> Result<Response, CatalogError>
where
    R: RestaurantRepository + Clone + Send + Sync + 'static,
{
    let restaurant = AuthorizeOwnerUseCase::new(state.repo.clone())
        .execute(auth.user_id, restaurant_id)
        .await?;

    req.extensions_mut().insert(OwnedRestaurant(restaurant));
    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for OwnedRestaurant
where
    S: Send + Sync,
{
    type Rejection = CatalogError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<OwnedRestaurant>()
            .cloned()
            .ok_or_else(|| CatalogError::Internal("ownership gate not mounted".into()))
    }
}
