//! HTTP Handlers

use std::sync::Arc;

use auth::AuthContext;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use kernel::id::RestaurantId;
use kernel::pagination::PageQuery;
use kernel::validation::{ValidatedJson, validate};

use crate::application::config::{DEFAULT_NEARBY_RADIUS_KM, DEFAULT_PREVIEW_LIMIT};
use crate::application::{
    CatalogConfig, GetRestaurantUseCase, ListRestaurantsUseCase, ManageRestaurantUseCase,
    NearbyRestaurantsUseCase, SyncRestaurantsUseCase,
};
use crate::domain::geo::Coordinates;
use crate::domain::repository::{RestaurantRepository, RestaurantSource, SyncRepository};
use crate::error::{CatalogError, CatalogResult};
use crate::presentation::dto::{
    CenterView, MessageResponse, NearbyQuery, NearbyResponse, PreviewData, PreviewQuery,
    PreviewResponse, PurgeData, PurgeResponse, RestaurantDetailResponse, RestaurantListQuery,
    RestaurantListResponse, RestaurantRequest, RestaurantResponse, SyncResponse,
};
use crate::presentation::middleware::OwnedRestaurant;

const MAX_PREVIEW_LIMIT: u32 = 200;

#[derive(Clone)]
pub struct CatalogAppState<R>
where
    R: RestaurantRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

#[derive(Clone)]
pub struct SyncAppState<R, S>
where
    R: RestaurantRepository + SyncRepository + Clone + Send + Sync + 'static,
    S: RestaurantSource + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub source: Arc<S>,
    pub config: Arc<CatalogConfig>,
}

// ============================================================================
// Restaurants
// ============================================================================

/// GET /api/restaurants
pub async fn list<R>(
    State(state): State<CatalogAppState<R>>,
    Query(page): Query<PageQuery>,
    Query(query): Query<RestaurantListQuery>,
) -> CatalogResult<Json<RestaurantListResponse>>
where
    R: RestaurantRepository + Clone + Send + Sync + 'static,
{
    validate(&page)?;

    let page = ListRestaurantsUseCase::new(state.repo.clone())
        .execute(query.into(), page)
        .await?;

    Ok(Json(RestaurantListResponse {
        restaurants: page.items.into_iter().map(Into::into).collect(),
        pagination: page.pagination,
    }))
}

/// GET /api/restaurants/{id}
pub async fn detail<R>(
    State(state): State<CatalogAppState<R>>,
    Path(restaurant_id): Path<RestaurantId>,
) -> CatalogResult<Json<RestaurantDetailResponse>>
where
    R: RestaurantRepository + Clone + Send + Sync + 'static,
{
    let detail = GetRestaurantUseCase::new(state.repo.clone())
        .execute(restaurant_id)
        .await?;

    Ok(Json(RestaurantDetailResponse {
        restaurant: detail.into(),
    }))
}

/// POST /api/restaurants
pub async fn create<R>(
    State(state): State<CatalogAppState<R>>,
    auth: AuthContext,
    ValidatedJson(req): ValidatedJson<RestaurantRequest>,
) -> CatalogResult<(StatusCode, Json<RestaurantResponse>)>
where
    R: RestaurantRepository + Clone + Send + Sync + 'static,
{
    let listing = ManageRestaurantUseCase::new(state.repo.clone())
        .create(auth.user_id, req.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RestaurantResponse {
            message: "Restaurant created successfully",
            restaurant: listing.into(),
        }),
    ))
}

/// PUT /api/restaurants/{id}
pub async fn update<R>(
    State(state): State<CatalogAppState<R>>,
    OwnedRestaurant(restaurant): OwnedRestaurant,
    ValidatedJson(req): ValidatedJson<RestaurantRequest>,
) -> CatalogResult<Json<RestaurantResponse>>
where
    R: RestaurantRepository + Clone + Send + Sync + 'static,
{
    let listing = ManageRestaurantUseCase::new(state.repo.clone())
        .update(restaurant, req.into())
        .await?;

    Ok(Json(RestaurantResponse {
        message: "Restaurant updated successfully",
        restaurant: listing.into(),
    }))
}

/// DELETE /api/restaurants/{id}
pub async fn delete<R>(
    State(state): State<CatalogAppState<R>>,
    OwnedRestaurant(restaurant): OwnedRestaurant,
) -> CatalogResult<Json<MessageResponse>>
where
    R: RestaurantRepository + Clone + Send + Sync + 'static,
{
    ManageRestaurantUseCase::new(state.repo.clone())
        .delete(restaurant.restaurant_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Restaurant deleted successfully",
    }))
}

/// GET /api/restaurants/nearby/location
pub async fn nearby<R>(
    State(state): State<CatalogAppState<R>>,
    Query(query): Query<NearbyQuery>,
) -> CatalogResult<Json<NearbyResponse>>
where
    R: RestaurantRepository + Clone + Send + Sync + 'static,
{
    let center = parse_center(&query)?;
    let radius = parse_radius(query.radius.as_deref())?;

    let nearby = NearbyRestaurantsUseCase::new(state.repo.clone())
        .execute(center, radius)
        .await?;

    Ok(Json(NearbyResponse {
        restaurants: nearby.into_iter().map(Into::into).collect(),
        center: CenterView {
            latitude: center.latitude,
            longitude: center.longitude,
        },
        radius,
    }))
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_center(query: &NearbyQuery) -> CatalogResult<Coordinates> {
    let (Some(lat), Some(lng)) = (present(query.lat.as_deref()), present(query.lng.as_deref()))
    else {
        return Err(CatalogError::MissingCoordinates);
    };

    let number = |s: &str| s.parse::<f64>().ok().filter(|v| v.is_finite());
    match (number(lat), number(lng)) {
        (Some(latitude), Some(longitude)) => Ok(Coordinates::new(latitude, longitude)),
        _ => Err(CatalogError::InvalidQuery(
            "Latitude and longitude must be valid numbers",
        )),
    }
}

fn parse_radius(raw: Option<&str>) -> CatalogResult<f64> {
    let Some(raw) = present(raw) else {
        return Ok(DEFAULT_NEARBY_RADIUS_KM);
    };
    raw.parse::<f64>()
        .ok()
        .filter(|r| r.is_finite() && *r >= 0.0)
        .ok_or(CatalogError::InvalidQuery("Radius must be a non-negative number"))
}

// ============================================================================
// Sync
// ============================================================================

/// POST /api/sync/restaurants
pub async fn sync<R, S>(State(state): State<SyncAppState<R, S>>) -> CatalogResult<Json<SyncResponse>>
where
    R: RestaurantRepository + SyncRepository + Clone + Send + Sync + 'static,
    S: RestaurantSource + Clone + Send + Sync + 'static,
{
    let report = SyncRestaurantsUseCase::new(
        state.repo.clone(),
        state.source.clone(),
        state.config.clone(),
    )
    .execute()
    .await?;

    Ok(Json(SyncResponse {
        message: "Restaurant sync completed successfully",
        data: report.into(),
    }))
}

/// GET /api/sync/restaurants/preview
pub async fn preview<R, S>(
    State(state): State<SyncAppState<R, S>>,
    Query(query): Query<PreviewQuery>,
) -> CatalogResult<Json<PreviewResponse>>
where
    R: RestaurantRepository + SyncRepository + Clone + Send + Sync + 'static,
    S: RestaurantSource + Clone + Send + Sync + 'static,
{
    // Zero or garbage falls back to the default
    let limit = present(query.limit.as_deref())
        .and_then(|l| l.parse::<u32>().ok())
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_PREVIEW_LIMIT)
        .min(MAX_PREVIEW_LIMIT);

    let preview = SyncRestaurantsUseCase::new(
        state.repo.clone(),
        state.source.clone(),
        state.config.clone(),
    )
    .preview(limit)
    .await?;

    Ok(Json(PreviewResponse {
        message: "Restaurant preview loaded successfully",
        data: PreviewData {
            count: preview.count,
            restaurants: preview.shown.into_iter().map(Into::into).collect(),
        },
    }))
}

/// DELETE /api/sync/restaurants
pub async fn purge<R, S>(State(state): State<SyncAppState<R, S>>) -> CatalogResult<Json<PurgeResponse>>
where
    R: RestaurantRepository + SyncRepository + Clone + Send + Sync + 'static,
    S: RestaurantSource + Clone + Send + Sync + 'static,
{
    let deleted = SyncRestaurantsUseCase::new(
        state.repo.clone(),
        state.source.clone(),
        state.config.clone(),
    )
    .purge()
    .await?;

    Ok(Json(PurgeResponse {
        message: "All restaurants deleted successfully",
        data: PurgeData {
            deleted_count: deleted,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(lat: Option<&str>, lng: Option<&str>) -> NearbyQuery {
        NearbyQuery {
            lat: lat.map(Into::into),
            lng: lng.map(Into::into),
            radius: None,
        }
    }

    #[test]
    fn test_center_requires_both_coordinates() {
        assert!(matches!(
            parse_center(&query(Some("4.6"), None)),
            Err(CatalogError::MissingCoordinates)
        ));
        assert!(matches!(
            parse_center(&query(Some(""), Some("-74.1"))),
            Err(CatalogError::MissingCoordinates)
        ));
        assert!(matches!(
            parse_center(&query(Some("north"), Some("-74.1"))),
            Err(CatalogError::InvalidQuery(_))
        ));
        let c = parse_center(&query(Some("4.6"), Some("-74.1"))).unwrap();
        assert_eq!(c, Coordinates::new(4.6, -74.1));
    }

    #[test]
    fn test_radius_defaults_and_bounds() {
        assert_eq!(parse_radius(None).unwrap(), 10.0);
        assert_eq!(parse_radius(Some("0")).unwrap(), 0.0);
        assert_eq!(parse_radius(Some("2.5")).unwrap(), 2.5);
        assert!(parse_radius(Some("-1")).is_err());
        assert!(parse_radius(Some("NaN")).is_err());
    }
}
