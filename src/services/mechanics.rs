use serde_json::Value;

use crate::errors::AppError;
use crate::models::{
    page_bounds, MechanicProfile, MechanicSearch, NearbySearch, MAX_PAGE_SIZE, MECHANICS_TABLE,
    MECHANIC_PROFILES_TABLE,
};
use crate::services::geo::{bounding_box, rank_nearby, GeoPoint, NearbyMechanic};
use crate::services::store::{DataStore, Query};

pub async fn search(store: &dyn DataStore, params: &MechanicSearch) -> Result<Vec<Value>, AppError> {
    if params.page == 0 {
        return Err(AppError::BadRequest("page starts at 1".to_string()));
    }
    if params.limit == 0 || params.limit > MAX_PAGE_SIZE {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }

    let mut query = Query::table(MECHANICS_TABLE);
    if let Some(specialty) = search_term("specialty", params.specialty.as_deref())? {
        query = query.contains("specialty", specialty);
    }
    if let Some(city) = search_term("city", params.city.as_deref())? {
        query = query.contains("city", city);
    }
    if let Some(min) = params.rating_min {
        query = query.gte("rating", min);
    }
    if let Some(max) = params.rating_max {
        query = query.lte("rating", max);
    }

    let (first, last) = page_bounds(params.page, params.limit);
    store
        .select(&query.range(first, last))
        .await
        .map_err(AppError::store)
}

pub async fn nearby(
    store: &dyn DataStore,
    params: &NearbySearch,
) -> Result<Vec<NearbyMechanic>, AppError> {
    let origin = GeoPoint::new(params.lat, params.lng);
    if !origin.is_valid() {
        return Err(AppError::BadRequest(
            "lat must be within [-90, 90] and lng within [-180, 180]".to_string(),
        ));
    }
    if !(params.radius_km > 0.0) {
        return Err(AppError::BadRequest("radius_km must be positive".to_string()));
    }
    if params.limit == 0 || params.limit > MAX_PAGE_SIZE {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }

    // Coarse prefilter in the data service; the exact radius check happens in
    // `rank_nearby`.
    let bbox = bounding_box(origin, params.radius_km);
    let mut query = Query::table(MECHANIC_PROFILES_TABLE)
        .gte("current_latitude", bbox.min_lat)
        .lte("current_latitude", bbox.max_lat);
    if let Some((min_lng, max_lng)) = bbox.lng {
        query = query
            .gte("current_longitude", min_lng)
            .lte("current_longitude", max_lng);
    }

    let rows = store.select(&query).await.map_err(AppError::store)?;
    let candidates = decode_profiles(rows);

    Ok(rank_nearby(
        origin,
        params.radius_km,
        candidates,
        params.specialty.as_deref(),
        params.limit as usize,
    ))
}

/// Looks the mechanic up by `user_id` in `mechanic_profiles`, then by `id` in
/// `mechanics`.
pub async fn find_mechanic(
    store: &dyn DataStore,
    mechanic_id: &str,
) -> Result<MechanicProfile, AppError> {
    let lookups = [
        (MECHANIC_PROFILES_TABLE, "user_id"),
        (MECHANICS_TABLE, "id"),
    ];

    for (table, column) in lookups {
        let rows = store
            .select(&Query::table(table).eq(column, mechanic_id))
            .await
            .map_err(AppError::store)?;

        if let Some(profile) = decode_profiles(rows).into_iter().next() {
            tracing::debug!(mechanic_id, table, "mechanic found");
            return Ok(profile);
        }
    }

    Err(AppError::NotFound(format!("mechanic {mechanic_id}")))
}

fn decode_profiles(rows: Vec<Value>) -> Vec<MechanicProfile> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed mechanic row");
                None
            }
        })
        .collect()
}

/// Substring terms are matched literally: pattern wildcards are stripped and a
/// term made only of wildcards is rejected.
fn search_term(field: &str, raw: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let term: String = raw.chars().filter(|c| !matches!(c, '*' | '%')).collect();
    let term = term.trim();
    if term.is_empty() {
        return Err(AppError::BadRequest(format!("{field} must contain searchable text")));
    }
    Ok(Some(term.to_string()))
}
