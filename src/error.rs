use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubburnError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Every candidate query came back empty
    #[error("No search result found for: {0}")]
    NotFound(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Probe error: {0}")]
    Probe(String),

    #[error("Subtitle extraction error: {0}")]
    Extraction(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Burn error: {0}")]
    Burn(String),

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("{tool} exited abnormally: {message}")]
    ExternalTool { tool: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SubburnError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SubburnError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, SubburnError>;
