use thiserror::Error;

pub type CustlysisResult<T> = Result<T, CustlysisError>;

#[derive(Error, Debug)]
pub enum CustlysisError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("{0} record has no key and none can be generated")]
    MissingKey(&'static str),

    #[error("Seed data error: {0}")]
    Seed(String),

    #[error("Failed to launch model process `{program}`: {reason}")]
    ModelLaunch { program: String, reason: String },

    #[error("Model process timed out after {0}s")]
    ModelTimeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
