#![deny(
    missing_debug_implementations,
    clippy::print_stderr,
    clippy::print_stdout
)]

//! # article-tags
//!
//! A `tag` entity with a single text attribute, associated many-to-many with
//! `article` through the `articles_tags` join table, built on
//! [SeaORM](https://www.sea-ql.org/SeaORM).
//!
//! ## Bootstrap
//!
//! ```no_run
//! # async fn function() -> article_tags::Result<()> {
//! use article_tags::{bootstrap, DatabaseConfig, Mutation, Query};
//!
//! let (db, registry) = bootstrap(&DatabaseConfig::from_env()?).await?;
//!
//! let articles = registry.get("tag").unwrap().association("articles").unwrap();
//! assert_eq!(articles.through.as_deref(), Some("articles_tags"));
//!
//! let tag = Mutation::create_tag(&db, Some("rust".to_owned())).await?;
//! let article = Mutation::create_article(&db, Some("Ownership".to_owned())).await?;
//! Mutation::add_article(&db, tag.id, article.id).await?;
//!
//! assert_eq!(Query::get_articles(&db, tag.id).await?, vec![article]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Registry
//!
//! Entities are registered under a model name and associations are declared
//! against those names. The [`RegistryBuilder`] resolves everything in one pass
//! when built, so the order of declarations does not matter, and
//! [`Registry::sync`] creates the tables with join tables after the tables
//! they reference.

pub mod config;
pub mod entity;
pub mod error;
pub mod registry;
pub mod service;

pub use config::DatabaseConfig;
pub use error::*;
pub use registry::{
    Association, AssociationKind, Attribute, EntityDefinition, Registry, RegistryBuilder,
};
pub use service::{Mutation, Query};

pub use sea_orm;

use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::info;

/// Connect, build the registry of [`entity`] and create any missing tables.
pub async fn bootstrap(config: &DatabaseConfig) -> Result<(DatabaseConnection, Registry)> {
    let db = config.connect().await?;
    let registry = entity::registry(db.get_database_backend())?;
    registry.sync(&db).await?;
    info!(
        "Registered {} models: {}",
        registry.len(),
        registry.creation_order().join(", ")
    );
    Ok((db, registry))
}
