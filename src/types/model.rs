use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Prefix Google puts in front of model identifiers in resource names.
const RESOURCE_PREFIX: &str = "models/";

/// Represents a Gemini model identifier.
///
/// This can be a predefined model version or a custom string value
/// for models that may be added in the future.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier (for future models or tuned models)
    Custom(String),
}

/// Known Gemini model versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// Gemini 1.5 Flash
    #[serde(rename = "gemini-1.5-flash")]
    Gemini15Flash,

    /// Gemini 1.5 Flash-8B
    #[serde(rename = "gemini-1.5-flash-8b")]
    Gemini15Flash8b,

    /// Gemini 1.5 Pro
    #[serde(rename = "gemini-1.5-pro")]
    Gemini15Pro,

    /// Gemini 2.0 Flash
    #[serde(rename = "gemini-2.0-flash")]
    Gemini20Flash,

    /// Gemini 2.0 Flash-Lite
    #[serde(rename = "gemini-2.0-flash-lite")]
    Gemini20FlashLite,

    /// Gemini 2.5 Flash
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,

    /// Gemini 2.5 Pro
    #[serde(rename = "gemini-2.5-pro")]
    Gemini25Pro,
}

impl KnownModel {
    const ALL: [KnownModel; 7] = [
        KnownModel::Gemini15Flash,
        KnownModel::Gemini15Flash8b,
        KnownModel::Gemini15Pro,
        KnownModel::Gemini20Flash,
        KnownModel::Gemini20FlashLite,
        KnownModel::Gemini25Flash,
        KnownModel::Gemini25Pro,
    ];

    /// The bare identifier, e.g. `gemini-1.5-flash`.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownModel::Gemini15Flash => "gemini-1.5-flash",
            KnownModel::Gemini15Flash8b => "gemini-1.5-flash-8b",
            KnownModel::Gemini15Pro => "gemini-1.5-pro",
            KnownModel::Gemini20Flash => "gemini-2.0-flash",
            KnownModel::Gemini20FlashLite => "gemini-2.0-flash-lite",
            KnownModel::Gemini25Flash => "gemini-2.5-flash",
            KnownModel::Gemini25Pro => "gemini-2.5-pro",
        }
    }
}

impl Model {
    /// The bare identifier without the `models/` prefix.
    pub fn id(&self) -> &str {
        match self {
            Model::Known(known) => known.as_str(),
            Model::Custom(custom) => custom.strip_prefix(RESOURCE_PREFIX).unwrap_or(custom),
        }
    }

    /// The resource name used in request paths, e.g. `models/gemini-1.5-flash`.
    pub fn resource_name(&self) -> String {
        format!("{RESOURCE_PREFIX}{}", self.id())
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Known(KnownModel::Gemini15Flash)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Model {
    type Err = String;

    /// Parses a model identifier, with or without the `models/` prefix.
    ///
    /// Unknown identifiers become [`Model::Custom`]; only an empty string is
    /// rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let id = trimmed.strip_prefix(RESOURCE_PREFIX).unwrap_or(trimmed);
        if id.is_empty() {
            return Err("model name must not be empty".to_string());
        }
        Ok(KnownModel::ALL
            .iter()
            .find(|known| known.as_str() == id)
            .map(|known| Model::Known(*known))
            .unwrap_or_else(|| Model::Custom(id.to_string())))
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        Model::Custom(model)
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        Model::Custom(model.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_model_serialization() {
        let model = Model::Known(KnownModel::Gemini15Flash);
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#""gemini-1.5-flash""#);
    }

    #[test]
    fn test_model_deserialization() {
        let model: Model = serde_json::from_str(r#""gemini-2.5-pro""#).unwrap();
        assert_eq!(model, Model::Known(KnownModel::Gemini25Pro));

        let model: Model = serde_json::from_str(r#""gemini-exp-1206""#).unwrap();
        assert_eq!(model, Model::Custom("gemini-exp-1206".to_string()));
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "gemini-2.0-flash".parse::<Model>().unwrap(),
            Model::Known(KnownModel::Gemini20Flash)
        );
        assert_eq!(
            "models/gemini-1.5-pro".parse::<Model>().unwrap(),
            Model::Known(KnownModel::Gemini15Pro)
        );
        assert_eq!(
            "models/tunedModels-foo".parse::<Model>().unwrap(),
            Model::Custom("tunedModels-foo".to_string())
        );
        assert!("".parse::<Model>().is_err());
        assert!("models/".parse::<Model>().is_err());
    }

    #[test]
    fn test_resource_name() {
        assert_eq!(Model::default().resource_name(), "models/gemini-1.5-flash");
        assert_eq!(
            Model::Custom("models/gemini-exp".to_string()).resource_name(),
            "models/gemini-exp"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Model::default().to_string(), "gemini-1.5-flash");
        assert_eq!(
            Model::Custom("gemini-exp".to_string()).to_string(),
            "gemini-exp"
        );
    }
}
