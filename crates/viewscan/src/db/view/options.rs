use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

///
/// ViewOptions
///
/// Named view request parameters. Keys are physical (already encoded) keys;
/// they are JSON-encoded when rendered as query parameters.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ViewOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startkey: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startkey_docid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endkey: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endkey_docid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl ViewOptions {
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.startkey.is_none() && self.endkey.is_none()
    }

    /// Render as ordered `(name, value)` query parameters.
    #[must_use]
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(key) = &self.startkey {
            params.push(("startkey", key.to_string()));
        }
        if let Some(id) = &self.startkey_docid {
            params.push(("startkey_docid", JsonValue::String(id.clone()).to_string()));
        }
        if let Some(key) = &self.endkey {
            params.push(("endkey", key.to_string()));
        }
        if let Some(id) = &self.endkey_docid {
            params.push(("endkey_docid", JsonValue::String(id.clone()).to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }

        params
    }

    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.to_query_params()
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_params_render_present_fields_in_order() {
        let options = ViewOptions {
            startkey: Some(json!([[128, 4.0]])),
            startkey_docid: Some("doc-9".into()),
            endkey: Some(json!([[128, 6.0]])),
            endkey_docid: None,
            limit: Some(11),
        };

        assert_eq!(
            options.to_query_string(),
            r#"startkey=[[128,4.0]]&startkey_docid="doc-9"&endkey=[[128,6.0]]&limit=11"#
        );
    }

    #[test]
    fn default_options_are_unbounded_and_empty() {
        let options = ViewOptions::default();

        assert!(options.is_unbounded());
        assert!(options.to_query_params().is_empty());
    }
}
