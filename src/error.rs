use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or unusable configuration, e.g. no API credential.
    #[error("{0}")]
    Config(String),

    /// User input rejected before any external call was made.
    #[error("{0}")]
    Validation(String),

    /// The text-generation service failed or returned something unusable.
    #[error("Error generating plan: {0}")]
    Generation(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image error: {0}")]
    Image(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Formatting or pagination failed while building the document.
    #[error("Error generating PDF: {0}")]
    Render(String),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}
