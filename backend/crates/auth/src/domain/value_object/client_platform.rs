//! Client platform tag recorded on each session

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ClientPlatform {
    #[default]
    #[display("mobile")]
    Mobile,
    #[display("web_owners")]
    WebOwners,
    #[display("web_admin")]
    WebAdmin,
}

impl ClientPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::WebOwners => "web_owners",
            Self::WebAdmin => "web_admin",
        }
    }
}

impl FromStr for ClientPlatform {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mobile" => Ok(Self::Mobile),
            "web_owners" => Ok(Self::WebOwners),
            "web_admin" => Ok(Self::WebAdmin),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        for p in [ClientPlatform::Mobile, ClientPlatform::WebOwners, ClientPlatform::WebAdmin] {
            assert_eq!(p.as_str().parse::<ClientPlatform>(), Ok(p));
            assert_eq!(p.to_string(), p.as_str());
        }
        assert!("desktop".parse::<ClientPlatform>().is_err());
        assert_eq!(ClientPlatform::default(), ClientPlatform::Mobile);
    }

    #[test]
    fn test_serde_tag() {
        let json = serde_json::to_string(&ClientPlatform::WebOwners).unwrap();
        assert_eq!(json, "\"web_owners\"");
    }
}
