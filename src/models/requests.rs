use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::ApiError;

/// Request body for POST /bmi
///
/// # Fields
/// - `weight`: Body weight in kilograms
/// - `height`: Height in centimeters
///
/// Field names match case-insensitively and unknown fields are ignored.
/// A `null` leaves the field unchanged, and absent fields read as zero,
/// which validation then rejects.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BmiRequest {
    /// Weight in kilograms
    pub weight: f64,
    /// Height in centimeters
    pub height: f64,
}

impl<'de> Deserialize<'de> for BmiRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(BmiRequestVisitor)
    }
}

struct BmiRequestVisitor;

impl<'de> Visitor<'de> for BmiRequestVisitor {
    type Value = BmiRequest;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with numeric weight and height")
    }

    fn visit_map<A>(self, mut map: A) -> Result<BmiRequest, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut req = BmiRequest::default();

        while let Some(key) = map.next_key::<String>()? {
            let field = if key.eq_ignore_ascii_case("weight") {
                &mut req.weight
            } else if key.eq_ignore_ascii_case("height") {
                &mut req.height
            } else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };

            if let Some(value) = map.next_value::<Option<f64>>()? {
                *field = value;
            }
        }

        Ok(req)
    }

    fn visit_unit<E: de::Error>(self) -> Result<BmiRequest, E> {
        // A bare `null` body decodes to an empty request
        Ok(BmiRequest::default())
    }
}

impl BmiRequest {
    /// Validates the request data.
    ///
    /// Height is checked before weight. Only exact zero is rejected;
    /// negative values are accepted.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.height == 0.0 {
            return Err(ApiError::InvalidHeight);
        }
        if self.weight == 0.0 {
            return Err(ApiError::InvalidWeight);
        }
        Ok(())
    }
}
