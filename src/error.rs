use miette::Diagnostic;
use thiserror::Error;

/// Main error type for pixsprite operations
#[derive(Error, Diagnostic, Debug)]
pub enum SpriteError {
    #[error("IO error: {0}")]
    #[diagnostic(code(pixsprite::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(pixsprite::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(pixsprite::config))]
    InvalidConfig {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Failed to decode {path}: {message}")]
    #[diagnostic(code(pixsprite::decode))]
    Decode {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Failed to encode {path}: {message}")]
    #[diagnostic(code(pixsprite::encode))]
    Encode {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Nothing to do: {message}")]
    #[diagnostic(code(pixsprite::empty))]
    EmptyInput {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(pixsprite::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, SpriteError>;
