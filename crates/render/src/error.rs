/// Errors from building the GPU program. Linking is the only fatal step:
/// compile problems are logged and linking is still attempted.
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    #[error("shader program failed to link: {0}")]
    Link(String),
}

/// Errors from loading a [`crate::RenderConfig`] file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported config file extension: {0:?}")]
    UnsupportedFormat(String),
}
