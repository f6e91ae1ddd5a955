//! Catalog value objects

use std::fmt;
use std::str::FromStr;

/// Categories an owner may pick when registering a restaurant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestaurantCategory {
    Italian,
    Mexican,
    Chinese,
    Japanese,
    American,
    Indian,
    Thai,
    Mediterranean,
    FastFood,
    Cafe,
    Bar,
    Other,
}

impl RestaurantCategory {
    pub const ALL: [RestaurantCategory; 12] = [
        Self::Italian,
        Self::Mexican,
        Self::Chinese,
        Self::Japanese,
        Self::American,
        Self::Indian,
        Self::Thai,
        Self::Mediterranean,
        Self::FastFood,
        Self::Cafe,
        Self::Bar,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Italian => "italian",
            Self::Mexican => "mexican",
            Self::Chinese => "chinese",
            Self::Japanese => "japanese",
            Self::American => "american",
            Self::Indian => "indian",
            Self::Thai => "thai",
            Self::Mediterranean => "mediterranean",
            Self::FastFood => "fast_food",
            Self::Cafe => "cafe",
            Self::Bar => "bar",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for RestaurantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RestaurantCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|c| c.as_str() == s).ok_or(())
    }
}

/// Price tier from 1 (cheap) to 4 (expensive)
pub const PRICE_RANGE_MIN: i16 = 1;
pub const PRICE_RANGE_MAX: i16 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for category in RestaurantCategory::ALL {
            assert_eq!(category.as_str().parse::<RestaurantCategory>(), Ok(category));
        }
    }

    #[test]
    fn test_rejects_imported_categories() {
        // Produced by the map import, never accepted from clients
        assert!("fast-food".parse::<RestaurantCategory>().is_err());
        assert!("Italian".parse::<RestaurantCategory>().is_err());
    }
}
