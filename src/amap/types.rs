//! Request and response types for the AMap endpoints.
//!
//! Responses are kept close to the upstream JSON: only `status` (and for POI
//! search, `pois` and `count`) are typed, everything else is carried through
//! as an opaque map.

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};

use super::error::{AmapError, AmapResult};

pub const DEFAULT_RADIUS: i64 = 1000;
pub const MAX_RADIUS: i64 = 50_000;
pub const DEFAULT_PAGE_NUM: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 25;

/// Upstream `status` value meaning success.
pub const STATUS_OK: &str = "1";

/// A single point of interest, exactly as returned upstream.
pub type Poi = Map<String, Value>;

// ============================================================================
// IP geolocation
// ============================================================================

/// Result of an IP geolocation lookup (`/v3/ip`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoResult {
    #[serde(deserialize_with = "deserialize_status")]
    pub status: String,

    /// Remaining fields: `info`, `province`, `city`, `adcode`, `rectangle`...
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl GeoResult {
    /// Look up a raw upstream field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Province name. AMap sends `[]` instead of a string when unknown.
    pub fn province(&self) -> Option<&str> {
        self.get_str("province")
    }

    pub fn city(&self) -> Option<&str> {
        self.get_str("city")
    }

    pub fn adcode(&self) -> Option<&str> {
        self.get_str("adcode")
    }

    /// Bounding rectangle as `"lng,lat;lng,lat"`.
    pub fn rectangle(&self) -> Option<&str> {
        self.get_str("rectangle")
    }

    /// Whether the upstream reported success.
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// True when the lookup succeeded but located nothing.
    pub fn is_empty(&self) -> bool {
        self.province().is_none() && self.city().is_none() && self.rectangle().is_none()
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

// ============================================================================
// Nearby search
// ============================================================================

/// Result of a nearby search (`/v5/place/around`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiResult {
    #[serde(deserialize_with = "deserialize_status")]
    pub status: String,

    /// Number of POIs on this page. AMap encodes it as a string.
    #[serde(default, deserialize_with = "deserialize_count")]
    pub count: Option<u64>,

    #[serde(default)]
    pub pois: Vec<Poi>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PoiResult {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }
}

/// Parameters of a nearby search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearbyQuery {
    /// Centre point as `"lng,lat"`. Checked upstream, not here.
    pub location: String,
    pub keywords: String,
    /// Comma-separated POI category codes.
    pub types: String,
    /// Search radius in metres, 0..=50000.
    pub radius: i64,
    /// Page number, starting at 1.
    pub page_num: i64,
    /// Page size, 1..=25.
    pub page_size: i64,
}

impl NearbyQuery {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            keywords: String::new(),
            types: String::new(),
            radius: DEFAULT_RADIUS,
            page_num: DEFAULT_PAGE_NUM,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    pub fn types(mut self, types: impl Into<String>) -> Self {
        self.types = types.into();
        self
    }

    pub fn radius(mut self, radius: i64) -> Self {
        self.radius = radius;
        self
    }

    pub fn page(mut self, page_num: i64, page_size: i64) -> Self {
        self.page_num = page_num;
        self.page_size = page_size;
        self
    }

    /// Reject values the upstream would refuse, before any request is made.
    pub fn validate(&self) -> AmapResult<()> {
        if self.location.trim().is_empty() {
            return Err(AmapError::invalid_argument(
                "location",
                "must be a 'lng,lat' pair",
            ));
        }
        if !(0..=MAX_RADIUS).contains(&self.radius) {
            return Err(AmapError::invalid_argument(
                "radius",
                format!("must be between 0 and {}, got {}", MAX_RADIUS, self.radius),
            ));
        }
        if self.page_num < 1 {
            return Err(AmapError::invalid_argument(
                "page_num",
                format!("must be at least 1, got {}", self.page_num),
            ));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(AmapError::invalid_argument(
                "page_size",
                format!(
                    "must be between 1 and {}, got {}",
                    MAX_PAGE_SIZE, self.page_size
                ),
            ));
        }
        Ok(())
    }

    /// Query-string pairs, excluding the API key. Empty optional filters are omitted.
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("location", self.location.clone())];
        if !self.keywords.is_empty() {
            pairs.push(("keywords", self.keywords.clone()));
        }
        if !self.types.is_empty() {
            pairs.push(("types", self.types.clone()));
        }
        pairs.push(("radius", self.radius.to_string()));
        pairs.push(("page_num", self.page_num.to_string()));
        pairs.push(("page_size", self.page_size.to_string()));
        pairs
    }
}

// ============================================================================
// Lenient field decoding
// ============================================================================

fn deserialize_status<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number for status, got {}",
            other
        ))),
    }
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_u64()),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid count '{}'", s))),
        Some(other) => Err(de::Error::custom(format!("invalid count {}", other))),
    }
}
