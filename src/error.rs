use sea_orm::DbErr;
use thiserror::Error;

/// An error from building the model registry or running a tag operation
#[derive(Error, Debug)]
pub enum Error {
    /// Raised by the database driver or SeaORM
    #[error(transparent)]
    Db(#[from] DbErr),
    /// A model name was referenced but never registered
    #[error("Model `{name}` is not registered (referenced by `{referenced_by}`)")]
    UnknownEntity {
        /// The missing model name
        name: String,
        /// The model or association that referenced it
        referenced_by: String,
    },
    /// The same model name was registered twice
    #[error("Model `{0}` is registered more than once")]
    DuplicateEntity(String),
    /// Two associations on one model share a name
    #[error("Model `{model}` already has an association named `{name}`")]
    DuplicateAssociation {
        /// The model owning the association
        model: String,
        /// The clashing association name
        name: String,
    },
    /// No tag row with this id
    #[error("Tag {0} not found")]
    TagNotFound(i32),
    /// No article row with this id
    #[error("Article {0} not found")]
    ArticleNotFound(i32),
    /// A configuration value could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result alias used across this crate
pub type Result<T, E = Error> = std::result::Result<T, E>;
