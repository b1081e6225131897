use serde::Deserialize;

pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct MechanicSearch {
    pub specialty: Option<String>,
    pub city: Option<String>,
    pub rating_min: Option<f64>,
    pub rating_max: Option<f64>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NearbySearch {
    pub lat: f64,
    pub lng: f64,
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
    pub specialty: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

fn default_radius_km() -> f64 {
    10.0
}

/// Row bounds `(offset, last)` of a 1-indexed page, both inclusive.
pub fn page_bounds(page: u32, limit: u32) -> (u64, u64) {
    let offset = u64::from(page.saturating_sub(1)) * u64::from(limit);
    (offset, offset + u64::from(limit).saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_bounds(1, 10), (0, 9));
        assert_eq!(page_bounds(3, 10), (20, 29));
        assert_eq!(page_bounds(2, 1), (1, 1));
    }
}
