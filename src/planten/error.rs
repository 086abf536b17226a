use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlantenError {
    #[error("{0}")]
    Validation(String),

    #[error("Plant not found: {0}")]
    PlantNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl PlantenError {
    pub fn validation(message: impl Into<String>) -> Self {
        PlantenError::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, PlantenError>;
