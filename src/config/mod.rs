pub mod env;
pub mod settings;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error(transparent)]
    Template(#[from] crate::modules::ingest::flow::TemplateError),
}
