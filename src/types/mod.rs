// Public modules
pub mod content;
pub mod generate_content;
pub mod message;
pub mod model;
pub mod model_info;

// Re-exports
pub use content::{Content, ContentRole, Part};
pub use generate_content::{
    Candidate, GenerateContentRequest, GenerateContentResponse, PromptFeedback, UsageMetadata,
};
pub use message::{Message, MessageRole};
pub use model::{KnownModel, Model};
pub use model_info::{ModelInfo, ModelListParams, ModelListResponse};
