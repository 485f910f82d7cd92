//! Error types for figure composition and export

use thiserror::Error;

/// Result type alias for figure operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, composing, or exporting a figure
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid layout or style configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Dataset or payload shape does not match the region consuming it
    #[error("Data shape mismatch: {0}")]
    DataShapeError(String),

    /// A renderer could not honor its contract
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// PNG encoding failed
    #[error("Encoding failed: {0}")]
    EncodeError(String),

    /// Filesystem failure while writing output
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Any of the above, attributed to the figure that failed
    #[error("Figure '{name}' failed: {source}")]
    FigureError {
        name: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the figure name to an error, leaving already-attributed errors alone.
    pub fn in_figure(self, name: &str) -> Self {
        match self {
            Error::FigureError { .. } => self,
            other => Error::FigureError {
                name: name.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// True for configuration errors, looking through figure attribution.
    pub fn is_config(&self) -> bool {
        match self {
            Error::ConfigError(_) => true,
            Error::FigureError { source, .. } => source.is_config(),
            _ => false,
        }
    }

    /// True for data-shape errors, looking through figure attribution.
    pub fn is_data_shape(&self) -> bool {
        match self {
            Error::DataShapeError(_) => true,
            Error::FigureError { source, .. } => source.is_data_shape(),
            _ => false,
        }
    }
}

impl From<png::EncodingError> for Error {
    fn from(err: png::EncodingError) -> Self {
        match err {
            png::EncodingError::IoError(e) => Error::IoError(e),
            other => Error::EncodeError(other.to_string()),
        }
    }
}
