use serde::{Deserialize, Serialize};

/// Information about a model in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Resource name, e.g. `models/gemini-1.5-flash`.
    pub name: String,

    /// A human-readable name for the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Maximum input tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_token_limit: Option<u64>,

    /// Maximum output tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_token_limit: Option<u64>,

    /// API methods the model supports, e.g. `generateContent`.
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

/// One page of the list models endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelListResponse {
    /// Models on this page.
    #[serde(default)]
    pub models: Vec<ModelInfo>,

    /// Token for the next page; absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl ModelListResponse {
    /// Returns true if there are more pages.
    pub fn has_more(&self) -> bool {
        self.next_page_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }
}

/// Query parameters for the list models endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModelListParams {
    /// Maximum number of models per page.
    pub page_size: Option<u32>,

    /// Token from a previous page.
    pub page_token: Option<String>,
}

impl ModelListParams {
    /// Create empty parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Set the page token.
    pub fn with_page_token(mut self, page_token: impl Into<String>) -> Self {
        self.page_token = Some(page_token.into());
        self
    }

    /// Render as query pairs.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(page_size) = self.page_size {
            query.push(("pageSize", page_size.to_string()));
        }
        if let Some(page_token) = &self.page_token {
            query.push(("pageToken", page_token.clone()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_list_deserialization() {
        let json = serde_json::json!({
            "models": [{
                "name": "models/gemini-1.5-flash",
                "version": "001",
                "displayName": "Gemini 1.5 Flash",
                "description": "Fast and versatile",
                "inputTokenLimit": 1000000,
                "outputTokenLimit": 8192,
                "supportedGenerationMethods": ["generateContent", "countTokens"],
                "temperature": 1.0
            }, {
                "name": "models/text-embedding-004",
                "supportedGenerationMethods": ["embedContent"]
            }],
            "nextPageToken": "abc"
        });
        let page: ModelListResponse = serde_json::from_value(json).unwrap();
        assert_eq!(page.models.len(), 2);
        assert!(page.has_more());
        assert_eq!(page.models[0].name, "models/gemini-1.5-flash");
        assert_eq!(
            page.models[0].display_name.as_deref(),
            Some("Gemini 1.5 Flash")
        );
        assert_eq!(
            page.models[1].supported_generation_methods,
            vec!["embedContent".to_string()]
        );
    }

    #[test]
    fn test_last_page() {
        let page: ModelListResponse = serde_json::from_str(r#"{"models": []}"#).unwrap();
        assert!(!page.has_more());
        let page: ModelListResponse =
            serde_json::from_str(r#"{"models": [], "nextPageToken": ""}"#).unwrap();
        assert!(!page.has_more());
    }

    #[test]
    fn test_params_query() {
        assert!(ModelListParams::new().to_query().is_empty());
        let params = ModelListParams::new()
            .with_page_size(50)
            .with_page_token("next");
        assert_eq!(
            params.to_query(),
            vec![("pageSize", "50".to_string()), ("pageToken", "next".to_string())]
        );
    }
}
