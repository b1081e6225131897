use serde::Serialize;

use crate::models::MechanicProfile;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Latitude/longitude rectangle enclosing every point within a radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    /// `None` when the circle reaches a pole or crosses the antimeridian, in
    /// which case every longitude must be considered.
    pub lng: Option<(f64, f64)>,
}

// Absorbs rounding so points exactly on the radius stay inside the box.
const BOX_SLACK_DEG: f64 = 1e-9;

/// Box around `center` covering the spherical cap of `radius_km`.
pub fn bounding_box(center: GeoPoint, radius_km: f64) -> BoundingBox {
    let angular = radius_km / EARTH_RADIUS_KM;
    let d_lat = angular.to_degrees() + BOX_SLACK_DEG;
    let min_lat = center.lat - d_lat;
    let max_lat = center.lat + d_lat;

    if min_lat <= -90.0 || max_lat >= 90.0 || angular >= std::f64::consts::FRAC_PI_2 {
        return BoundingBox {
            min_lat: min_lat.max(-90.0),
            max_lat: max_lat.min(90.0),
            lng: None,
        };
    }

    let d_lng = (angular.sin() / center.lat.to_radians().cos()).asin().to_degrees() + BOX_SLACK_DEG;
    let min_lng = center.lng - d_lng;
    let max_lng = center.lng + d_lng;
    let lng = (min_lng >= -180.0 && max_lng <= 180.0).then_some((min_lng, max_lng));

    BoundingBox { min_lat, max_lat, lng }
}

/// Great-circle distance on a sphere of mean Earth radius.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[derive(Debug, Clone, Serialize)]
pub struct NearbyMechanic {
    #[serde(flatten)]
    pub mechanic: MechanicProfile,
    pub distance_km: f64,
}

/// Mechanics within `radius_km` of `origin` (inclusive), nearest first, at
/// most `limit` of them. Candidates without coordinates are dropped.
pub fn rank_nearby(
    origin: GeoPoint,
    radius_km: f64,
    candidates: Vec<MechanicProfile>,
    specialty: Option<&str>,
    limit: usize,
) -> Vec<NearbyMechanic> {
    let specialty = specialty.map(str::trim).filter(|s| !s.is_empty());

    let mut nearby: Vec<(f64, MechanicProfile)> = candidates
        .into_iter()
        .filter_map(|mechanic| {
            let (lat, lng) = mechanic.coordinates()?;
            let distance = haversine_km(origin, GeoPoint::new(lat, lng));
            if distance > radius_km {
                return None;
            }
            if let Some(needle) = specialty {
                let matched = mechanic
                    .specialties
                    .as_ref()
                    .is_some_and(|s| s.matches(needle));
                if !matched {
                    return None;
                }
            }
            Some((distance, mechanic))
        })
        .collect();

    nearby.sort_by(|a, b| a.0.total_cmp(&b.0));
    nearby
        .into_iter()
        .take(limit)
        .map(|(distance, mechanic)| NearbyMechanic {
            mechanic,
            distance_km: (distance * 10.0).round() / 10.0,
        })
        .collect()
}
