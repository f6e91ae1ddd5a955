//! Geo-proximity filter
//!
//! 球面上の大円距離（Haversine 公式）で中心点からの距離を求め、
//! 半径内の店舗を近い順に並べます。
//!
//! 並び順の規則:
//! - 距離の昇順
//! - ただし距離差が 1 km 未満の 2 件は評価の高い方を先にする
//!
//! この規則は推移的ではないため `sort_by` の比較関数には渡せません。
//! 距離で安定ソートした後、隣接要素だけを比較する挿入パスで仕上げます。

use std::cmp::Ordering;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distances closer than this are ranked by rating instead
pub const TIE_BREAK_KM: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Anything with a position and a rating can be ranked
pub trait Located {
    fn coordinates(&self) -> Coordinates;
    fn rating(&self) -> f64;
}

/// An item together with its distance from the search center
#[derive(Debug, Clone)]
pub struct Nearby<T> {
    pub item: T,
    pub distance_km: f64,
}

/// Great-circle distance in kilometres
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Keep items whose distance from `center` is at most `radius_km`
pub fn filter_by_radius<T, I>(items: I, center: Coordinates, radius_km: f64) -> Vec<Nearby<T>>
where
    T: Located,
    I: IntoIterator<Item = T>,
{
    items
        .into_iter()
        .filter_map(|item| {
            let distance_km = haversine_km(center, item.coordinates());
            (distance_km <= radius_km).then_some(Nearby { item, distance_km })
        })
        .collect()
}

/// Ascending distance; near-ties go to the higher rating
pub fn sort_by_distance<T: Located>(items: &mut [Nearby<T>]) {
    items.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && precedes(&items[j], &items[j - 1]) == Ordering::Less {
            items.swap(j, j - 1);
            j -= 1;
        }
    }
}

fn precedes<T: Located>(a: &Nearby<T>, b: &Nearby<T>) -> Ordering {
    if (a.distance_km - b.distance_km).abs() < TIE_BREAK_KM {
        b.item.rating().total_cmp(&a.item.rating())
    } else {
        a.distance_km.total_cmp(&b.distance_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Spot {
        name: &'static str,
        at: Coordinates,
        rating: f64,
    }

    impl Located for Spot {
        fn coordinates(&self) -> Coordinates {
            self.at
        }
        fn rating(&self) -> f64 {
            self.rating
        }
    }

    const CENTER: Coordinates = Coordinates::new(4.6097, -74.0817);

    /// Point `km` kilometres due north of the center
    fn north_of_center(km: f64) -> Coordinates {
        let degrees = (km / EARTH_RADIUS_KM).to_degrees();
        Coordinates::new(CENTER.latitude + degrees, CENTER.longitude)
    }

    fn spot(name: &'static str, km: f64, rating: f64) -> Spot {
        Spot {
            name,
            at: north_of_center(km),
            rating,
        }
    }

    fn names(items: &[Nearby<Spot>]) -> Vec<&'static str> {
        items.iter().map(|n| n.item.name).collect()
    }

    #[test]
    fn test_haversine_known_distance() {
        // Bogotá -> Medellín, roughly 240 km
        let medellin = Coordinates::new(6.2442, -75.5812);
        let d = haversine_km(CENTER, medellin);
        assert!((230.0..250.0).contains(&d), "{d}");
        assert_eq!(haversine_km(CENTER, CENTER), 0.0);
    }

    #[test]
    fn test_north_offset_matches_distance() {
        let d = haversine_km(CENTER, north_of_center(2.9));
        assert!((d - 2.9).abs() < 1e-6, "{d}");
    }

    #[test]
    fn test_radius_is_monotonic() {
        let spots = vec![
            spot("a", 0.5, 1.0),
            spot("b", 3.0, 1.0),
            spot("c", 7.5, 1.0),
            spot("d", 15.0, 1.0),
        ];
        let mut previous = 0;
        for radius in [0.0, 1.0, 5.0, 10.0, 20.0] {
            let kept = filter_by_radius(spots.clone(), CENTER, radius).len();
            assert!(kept >= previous, "radius {radius}");
            previous = kept;
        }
        assert_eq!(previous, 4);
    }

    #[test]
    fn test_zero_radius_keeps_only_exact_center() {
        let spots = vec![spot("here", 0.0, 1.0), spot("near", 0.1, 5.0)];
        let kept = filter_by_radius(spots, CENTER, 0.0);
        assert_eq!(names(&kept), vec!["here"]);
    }

    #[test]
    fn test_close_distances_rank_by_rating() {
        let mut items = filter_by_radius(
            vec![spot("a", 2.0, 3.0), spot("b", 2.9, 5.0)],
            CENTER,
            10.0,
        );
        sort_by_distance(&mut items);
        assert_eq!(names(&items), vec!["b", "a"]);
    }

    #[test]
    fn test_far_distances_rank_by_distance() {
        let mut items = filter_by_radius(
            vec![spot("far", 5.0, 5.0), spot("near", 2.0, 1.0)],
            CENTER,
            10.0,
        );
        sort_by_distance(&mut items);
        assert_eq!(names(&items), vec!["near", "far"]);
    }

    #[test]
    fn test_equal_rating_keeps_distance_order() {
        let mut items = filter_by_radius(
            vec![spot("second", 1.4, 4.0), spot("first", 1.0, 4.0)],
            CENTER,
            10.0,
        );
        sort_by_distance(&mut items);
        assert_eq!(names(&items), vec!["first", "second"]);
    }

    #[test]
    fn test_sort_handles_chained_near_ties() {
        // a~b and b~c are near-ties, a and c are not
        let mut items = filter_by_radius(
            vec![spot("a", 1.0, 1.0), spot("b", 1.6, 2.0), spot("c", 2.2, 3.0)],
            CENTER,
            10.0,
        );
        sort_by_distance(&mut items);
        assert_eq!(items.len(), 3);
        for pair in items.windows(2) {
            let near_tie = (pair[0].distance_km - pair[1].distance_km).abs() < TIE_BREAK_KM;
            if near_tie {
                assert!(pair[0].item.rating >= pair[1].item.rating);
            } else {
                assert!(pair[0].distance_km <= pair[1].distance_km);
            }
        }
    }
}
