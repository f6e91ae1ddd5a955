//! Overpass API client
//!
//! Queries `amenity=restaurant` nodes and ways inside the configured
//! bounding box and maps them to [`SyncCandidate`]s.

use std::collections::HashMap;

use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::application::config::{BoundingBox, CatalogConfig};
use crate::domain::entity::SyncCandidate;
use crate::domain::repository::RestaurantSource;
use crate::error::CatalogResult;

#[derive(Clone)]
pub struct OverpassClient {
    http: reqwest::Client,
    url: String,
    bounds: BoundingBox,
    default_city: String,
}

impl OverpassClient {
    pub fn new(config: &CatalogConfig) -> CatalogResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.overpass_timeout)
            .user_agent(concat!("restaurant-catalog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            url: config.overpass_url.clone(),
            bounds: config.bounds,
            default_city: config.default_city.clone(),
        })
    }
}

impl RestaurantSource for OverpassClient {
    async fn fetch(&self, limit: u32) -> CatalogResult<Vec<SyncCandidate>> {
        let response = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "text/plain")
            .body(build_query(&self.bounds, limit))
            .send()
            .await?
            .error_for_status()?;

        let body: OverpassResponse = response.json().await?;
        let candidates: Vec<SyncCandidate> = body
            .elements
            .into_iter()
            .filter_map(|element| to_candidate(element, &self.default_city))
            .take(limit as usize)
            .collect();

        tracing::info!(found = candidates.len(), "Overpass returned restaurants");
        Ok(candidates)
    }
}

/// Overpass QL for restaurants inside `bounds`, at most `limit` elements
pub fn build_query(bounds: &BoundingBox, limit: u32) -> String {
    let bbox = format!(
        "{},{},{},{}",
        bounds.south, bounds.west, bounds.north, bounds.east
    );
    format!(
        "[out:json][timeout:25];\n\
         (\n  node[\"amenity\"=\"restaurant\"]({bbox});\n  way[\"amenity\"=\"restaurant\"]({bbox});\n);\n\
         out geom {limit};\n"
    )
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
struct Element {
    #[serde(rename = "type")]
    kind: String,
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    geometry: Vec<GeoPoint>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct GeoPoint {
    lat: f64,
    lon: f64,
}

// ============================================================================
// Mapping
// ============================================================================

fn to_candidate(element: Element, default_city: &str) -> Option<SyncCandidate> {
    let name = element.tags.get("name").filter(|n| !n.trim().is_empty())?.clone();

    let (latitude, longitude) = match element.kind.as_str() {
        "way" => centroid(&element.geometry)?,
        _ => (element.lat?, element.lon?),
    };

    let tags = &element.tags;
    let cuisine = tags.get("cuisine").map(String::as_str);

    Some(SyncCandidate {
        source_id: format!("osm_{}", element.id),
        name,
        address: build_address(tags, default_city),
        latitude,
        longitude,
        phone: first_tag(tags, &["phone", "contact:phone"]),
        website: first_tag(tags, &["website", "contact:website"]),
        category: category_for(cuisine).to_string(),
        price_range: price_range_for(cuisine),
        tags: search_tags(tags),
    })
}

fn centroid(points: &[GeoPoint]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let lat = points.iter().map(|p| p.lat).sum::<f64>() / n;
    let lon = points.iter().map(|p| p.lon).sum::<f64>() / n;
    Some((lat, lon))
}

fn first_tag(tags: &HashMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| tags.get(*k))
        .filter(|v| !v.is_empty())
        .cloned()
}

/// `housenumber, street, city`; the city falls back to `default_city`
pub fn build_address(tags: &HashMap<String, String>, default_city: &str) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(3);
    if let Some(number) = tags.get("addr:housenumber") {
        parts.push(number);
    }
    if let Some(street) = tags.get("addr:street") {
        parts.push(street);
    }
    parts.push(tags.get("addr:city").map_or(default_city, String::as_str));
    parts.join(", ")
}

/// Category from the free-form `cuisine` tag; first matching rule wins
pub fn category_for(cuisine: Option<&str>) -> &'static str {
    let Some(cuisine) = cuisine else {
        return "restaurant";
    };
    let c = cuisine.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| c.contains(n));

    if has(&["pizza"]) {
        "pizza"
    } else if has(&["burger", "hamburger"]) {
        "fast-food"
    } else if has(&["sushi", "japanese"]) {
        "japanese"
    } else if has(&["mexican", "taco"]) {
        "mexican"
    } else if has(&["coffee", "cafe"]) {
        "coffee"
    } else if has(&["italian", "pasta"]) {
        "italian"
    } else if has(&["chinese"]) {
        "chinese"
    } else if has(&["indian"]) {
        "indian"
    } else if has(&["thai"]) {
        "thai"
    } else if has(&["vegetarian", "vegan"]) {
        "vegetarian"
    } else {
        "restaurant"
    }
}

/// Price tier estimate from the `cuisine` tag
pub fn price_range_for(cuisine: Option<&str>) -> i16 {
    let Some(cuisine) = cuisine else {
        return 2;
    };
    let c = cuisine.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| c.contains(n));

    if has(&["pizza", "burger"]) {
        2
    } else if has(&["sushi", "japanese"]) {
        4
    } else if has(&["coffee", "cafe"]) {
        1
    } else if has(&["italian", "french"]) {
        4
    } else if has(&["mexican", "thai"]) {
        2
    } else {
        3
    }
}

fn search_tags(tags: &HashMap<String, String>) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(cuisine) = tags.get("cuisine") {
        out.push(cuisine.to_lowercase());
    }
    for (key, hint) in [
        ("outdoor_seating", "outdoor"),
        ("delivery", "delivery"),
        ("takeaway", "takeaway"),
        ("wifi", "wifi"),
        ("air_conditioning", "ac"),
    ] {
        if tags.contains_key(key) {
            out.push(hint.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<SyncCandidate> {
        let body: OverpassResponse = serde_json::from_str(json).unwrap();
        body.elements
            .into_iter()
            .filter_map(|e| to_candidate(e, "Bogotá"))
            .collect()
    }

    #[test]
    fn test_query_uses_bounds_and_limit() {
        let q = build_query(&BoundingBox::BOGOTA, 50);
        assert!(q.starts_with("[out:json][timeout:25];"));
        assert!(q.contains("node[\"amenity\"=\"restaurant\"](4.45,-74.25,4.8,-74)"));
        assert!(q.contains("way[\"amenity\"=\"restaurant\"](4.45,-74.25,4.8,-74)"));
        assert!(q.contains("out geom 50;"));
    }

    #[test]
    fn test_maps_node_and_way() {
        let items = parse(
            r#"{"elements": [
                {"type": "node", "id": 1, "lat": 4.6, "lon": -74.07,
                 "tags": {"amenity": "restaurant", "name": "Andrés DC",
                          "cuisine": "Regional;Burger", "contact:phone": "+57 1 863 7880",
                          "addr:street": "Calle 82", "addr:housenumber": "12-21",
                          "outdoor_seating": "yes"}},
                {"type": "way", "id": 2,
                 "geometry": [{"lat": 4.0, "lon": -74.0}, {"lat": 5.0, "lon": -75.0}],
                 "tags": {"amenity": "restaurant", "name": "Sushi Gozen",
                          "cuisine": "sushi", "website": "https://gozen.example",
                          "addr:city": "Chía"}}
            ]}"#,
        );

        assert_eq!(items.len(), 2);
        let node = &items[0];
        assert_eq!(node.source_id, "osm_1");
        assert_eq!(node.address, "12-21, Calle 82, Bogotá");
        assert_eq!(node.category, "fast-food");
        assert_eq!(node.price_range, 2);
        assert_eq!(node.phone.as_deref(), Some("+57 1 863 7880"));
        assert_eq!(node.tags, vec!["regional;burger", "outdoor"]);

        let way = &items[1];
        assert_eq!((way.latitude, way.longitude), (4.5, -74.5));
        assert_eq!(way.address, "Chía");
        assert_eq!(way.category, "japanese");
        assert_eq!(way.price_range, 4);
        assert_eq!(way.website.as_deref(), Some("https://gozen.example"));
    }

    #[test]
    fn test_skips_unnamed_and_unplaced() {
        let items = parse(
            r#"{"elements": [
                {"type": "node", "id": 1, "lat": 4.6, "lon": -74.07, "tags": {"amenity": "restaurant"}},
                {"type": "node", "id": 2, "tags": {"name": "Nowhere"}},
                {"type": "way", "id": 3, "geometry": [], "tags": {"name": "Empty Way"}},
                {"type": "node", "id": 4, "lat": 4.6, "lon": -74.07}
            ]}"#,
        );
        assert!(items.is_empty());
    }

    #[test]
    fn test_missing_elements_is_empty() {
        assert!(parse("{}").is_empty());
    }

    #[test]
    fn test_category_table() {
        assert_eq!(category_for(None), "restaurant");
        assert_eq!(category_for(Some("pizza;italian")), "pizza");
        assert_eq!(category_for(Some("Hamburger")), "fast-food");
        assert_eq!(category_for(Some("tacos")), "mexican");
        assert_eq!(category_for(Some("coffee_shop")), "coffee");
        assert_eq!(category_for(Some("pasta")), "italian");
        assert_eq!(category_for(Some("vegan")), "vegetarian");
        assert_eq!(category_for(Some("colombian")), "restaurant");
    }

    #[test]
    fn test_price_table() {
        assert_eq!(price_range_for(None), 2);
        assert_eq!(price_range_for(Some("cafe")), 1);
        assert_eq!(price_range_for(Some("french")), 4);
        assert_eq!(price_range_for(Some("thai")), 2);
        assert_eq!(price_range_for(Some("colombian")), 3);
    }
}
