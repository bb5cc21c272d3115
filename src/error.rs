use thiserror::Error;

/// Reasons the background cannot be mounted. None of these reach the page as
/// exceptions; the JS boundary logs them and renders nothing.
#[derive(Debug, Error)]
pub enum DotFieldError {
    #[error("WebGL2 is not available")]
    Unsupported,
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: &'static str, log: String },
    #[error("shader program failed to link: {0}")]
    ProgramLink(String),
    #[error("failed to create {0}")]
    MissingResource(&'static str),
    #[error("DOM call failed: {0}")]
    Dom(String),
}

pub type Result<T> = std::result::Result<T, DotFieldError>;
