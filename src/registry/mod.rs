//! The model registry: entity definitions keyed by model name, with their
//! associations wired in one pass when the registry is built.

mod definition;
mod topology;

pub use definition::*;

use crate::{Error, Result};
use sea_orm::{ConnectionTrait, DbBackend, EntityTrait, Schema, Statement};
use std::collections::BTreeMap;
use topology::TopologicalSort;
use tracing::debug;

/// Collects entity definitions and association declarations.
///
/// Nothing is resolved until [`RegistryBuilder::build`], so entities and
/// associations may be declared in any order.
#[derive(Debug)]
pub struct RegistryBuilder {
    backend: DbBackend,
    entities: Vec<EntityDefinition>,
    associations: Vec<Declared>,
}

#[derive(Debug)]
struct Declared {
    source: String,
    target: String,
    through: String,
    alias: Option<(String, String)>,
}

impl RegistryBuilder {
    /// An empty builder producing tables for `backend`
    pub fn new(backend: DbBackend) -> Self {
        Self {
            backend,
            entities: Vec::new(),
            associations: Vec::new(),
        }
    }

    /// Register an entity under a model name
    pub fn register<E: EntityTrait>(mut self, name: &str, entity: E) -> Self {
        debug!("Registering model `{name}` ({})", entity.table_name());
        let schema = Schema::new(self.backend);
        self.entities
            .push(EntityDefinition::from_entity(name, entity, &schema));
        self
    }

    /// Declare that `source` belongs to many `target` through the join model `through`.
    ///
    /// The association is named after the target's table, e.g. `articles`.
    pub fn belongs_to_many(self, source: &str, target: &str, through: &str) -> Self {
        self.declare(source, target, through, None)
    }

    /// Same as [`RegistryBuilder::belongs_to_many`] with an explicit association name.
    ///
    /// `singular` names one member of the association and is used by the
    /// single-item accessors, e.g. `("categories", "category")` gives
    /// `get_categories` and `add_category`.
    pub fn belongs_to_many_as(
        self,
        source: &str,
        target: &str,
        through: &str,
        alias: &str,
        singular: &str,
    ) -> Self {
        self.declare(source, target, through, Some((alias, singular)))
    }

    fn declare(
        mut self,
        source: &str,
        target: &str,
        through: &str,
        alias: Option<(&str, &str)>,
    ) -> Self {
        self.associations.push(Declared {
            source: source.to_owned(),
            target: target.to_owned(),
            through: through.to_owned(),
            alias: alias.map(|(name, singular)| (name.to_owned(), singular.to_owned())),
        });
        self
    }

    /// Validate all declarations and wire the associations.
    pub fn build(self) -> Result<Registry> {
        let Self {
            backend,
            entities,
            associations,
        } = self;

        let mut index = BTreeMap::new();
        for (i, entity) in entities.iter().enumerate() {
            if index.insert(entity.name.clone(), i).is_some() {
                return Err(Error::DuplicateEntity(entity.name.clone()));
            }
        }

        let lookup = |name: &str, referenced_by: &str| {
            index.get(name).copied().ok_or_else(|| Error::UnknownEntity {
                name: name.to_owned(),
                referenced_by: referenced_by.to_owned(),
            })
        };

        let mut sorter = TopologicalSort::new(entities.len());
        let mut wired: Vec<Vec<Association>> = vec![Vec::new(); entities.len()];
        for declared in associations {
            let source = lookup(&declared.source, &declared.source)?;
            let target = lookup(&declared.target, &declared.source)?;
            let through = lookup(&declared.through, &declared.source)?;

            let (name, singular) = match declared.alias {
                Some(alias) => alias,
                None => (
                    entities[target].table_name.clone(),
                    entities[target].name.clone(),
                ),
            };
            let mut taken = entities[source].associations.iter().chain(wired[source].iter());
            if taken.any(|a| a.name == name) {
                return Err(Error::DuplicateAssociation {
                    model: declared.source,
                    name,
                });
            }

            // the join table references both sides
            sorter.add_dependency(source, through);
            sorter.add_dependency(target, through);

            debug!(
                "Wiring `{}` belongs to many `{}` through `{}` as `{name}`",
                declared.source, declared.target, declared.through
            );
            wired[source].push(Association {
                kind: AssociationKind::BelongsToMany,
                name,
                singular,
                target: declared.target,
                through: Some(declared.through),
            });
        }

        let order = sorter
            .into_order()
            .into_iter()
            .map(|i| entities[i].name.clone())
            .collect();

        let entities = entities
            .into_iter()
            .zip(wired)
            .map(|(mut entity, wired)| {
                entity.associations.extend(wired);
                (entity.name.clone(), entity)
            })
            .collect();

        Ok(Registry {
            backend,
            entities,
            order,
        })
    }
}

/// Entity definitions keyed by model name. Immutable once built.
#[derive(Clone, Debug)]
pub struct Registry {
    backend: DbBackend,
    entities: BTreeMap<String, EntityDefinition>,
    order: Vec<String>,
}

impl Registry {
    /// Shorthand for [`RegistryBuilder::new`]
    pub fn builder(backend: DbBackend) -> RegistryBuilder {
        RegistryBuilder::new(backend)
    }

    /// The definition registered under `name`
    pub fn get(&self, name: &str) -> Option<&EntityDefinition> {
        self.entities.get(name)
    }

    /// Whether a model named `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// Registered model names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// Number of registered models
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no model is registered
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Model names in the order their tables have to be created
    pub fn creation_order(&self) -> &[String] {
        &self.order
    }

    /// `CREATE TABLE IF NOT EXISTS` statements in creation order
    pub fn create_table_statements(&self) -> Vec<Statement> {
        self.statements_for(self.backend)
    }

    fn statements_for(&self, backend: DbBackend) -> Vec<Statement> {
        self.order
            .iter()
            .filter_map(|name| self.entities.get(name))
            .map(|entity| {
                let mut stmt = entity.table.clone();
                stmt.if_not_exists();
                backend.build(&stmt)
            })
            .collect()
    }

    /// Create every registered table that does not exist yet.
    ///
    /// This operation is addition only, it never alters or drops anything.
    pub async fn sync<C: ConnectionTrait>(&self, db: &C) -> Result<()> {
        let backend = db.get_database_backend();
        for (name, stmt) in self.order.iter().zip(self.statements_for(backend)) {
            db.execute(stmt).await?;
            debug!("Synced table of `{name}`");
        }
        Ok(())
    }
}
