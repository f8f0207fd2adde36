use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid id: {0:?}")]
    InvalidId(String),

    #[error("Duplicate element id: {0:?}")]
    DuplicateElement(String),

    #[error("Element not found: {0:?}")]
    ElementNotFound(String),

    #[error("Invalid model {id:?}:\n  - {}", diagnostics.join("\n  - "))]
    InvalidModel { id: String, diagnostics: Vec<String> },

    #[error("{0} is not a registered rendering function")]
    UnknownRenderer(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;
