use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum OsmprjError {
    #[error("invalid region descriptor: {0}")]
    InvalidRegion(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("request timed out, unable to verify GeoFabrik resource (server could be down): {0}")]
    ResourceTimeout(String),

    #[error("not a valid GeoFabrik resource: {0}")]
    ResourceInvalid(String),

    #[error("download failed: {0}")]
    Http(String),

    #[error("server returned status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("unable to create cache directory {path}: {message}")]
    CacheDirectory { path: PathBuf, message: String },

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("unable to find {0}")]
    MissingTool(String),

    #[error("{tool} exited with status {code}")]
    ToolFailure { tool: String, code: i32 },

    #[error("database error: {0}")]
    Database(String),
}
