//! Entities of the tagging schema: [`tag`], [`article`] and the
//! [`articles_tags`] join table.

pub mod article;
pub mod articles_tags;
pub mod prelude;
pub mod tag;

use crate::registry::{Registry, RegistryBuilder};
use crate::Result;
use sea_orm::DbBackend;

/// Builds the registry for every entity in this module.
///
/// All entities are registered first and all associations declared after,
/// then the builder wires them in a single pass.
pub fn registry(backend: DbBackend) -> Result<Registry> {
    let builder = RegistryBuilder::new(backend);
    let builder = tag::init(builder);
    let builder = article::init(builder);
    let builder = articles_tags::init(builder);
    let builder = tag::associate(builder);
    let builder = article::associate(builder);
    builder.build()
}
