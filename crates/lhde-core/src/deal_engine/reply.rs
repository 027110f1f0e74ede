//! Interpreting Deal Engine response bodies.

use std::collections::HashMap;
use std::fmt;

use serde_json::value::RawValue;
use serde_json::{Map, Value};

use super::error::DealError;

/// True when the declared media type is `application/json`, ignoring
/// parameters such as `charset` and letter case.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

/// What the `add_cid` endpoint answered with.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitReply {
    /// JSON object body, decoded generically.
    Json(Map<String, Value>),
    /// Any non-JSON body, as text.
    Text(String),
}

impl SubmitReply {
    pub(crate) fn parse(content_type: Option<&str>, body: &[u8]) -> Result<Self, DealError> {
        if is_json_content_type(content_type) {
            // `null` is an empty object, same as for deal_status.
            let map: Option<Map<String, Value>> = serde_json::from_slice(body)?;
            Ok(SubmitReply::Json(map.unwrap_or_default()))
        } else {
            Ok(SubmitReply::Text(String::from_utf8_lossy(body).into_owned()))
        }
    }
}

impl fmt::Display for SubmitReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitReply::Json(map) => write!(f, "{}", Value::Object(map.clone())),
            SubmitReply::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Proof and deal fields for a CID, as raw JSON text exactly as the service
/// sent them (a string value keeps its quotes).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DealStatus {
    pub proof: String,
    pub filecoin_deals: String,
}

impl DealStatus {
    /// JSON bodies yield the two top-level fragments (missing keys are empty).
    /// Anything else is returned whole in `proof`.
    pub(crate) fn parse(content_type: Option<&str>, body: &[u8]) -> Result<Self, DealError> {
        if !is_json_content_type(content_type) {
            return Ok(DealStatus {
                proof: String::from_utf8_lossy(body).into_owned(),
                filecoin_deals: String::new(),
            });
        }

        // A literal `null` body decodes to no fields at all.
        let fields: Option<HashMap<String, Box<RawValue>>> = serde_json::from_slice(body)?;
        let mut fields = fields.unwrap_or_default();
        let mut take = |key: &str| {
            fields
                .remove(key)
                .map(|raw| raw.get().to_string())
                .unwrap_or_default()
        };
        Ok(DealStatus {
            proof: take("proof"),
            filecoin_deals: take("filecoin_deals"),
        })
    }

    /// True once the service reports at least one deal: the fragment is
    /// present and not an empty value.
    pub fn has_deals(&self) -> bool {
        !matches!(
            self.filecoin_deals.trim(),
            "" | "null" | "\"\"" | "[]" | "{}"
        )
    }
}
