use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{ColumnTrait, ColumnType, EntityTrait, Iden, Iterable, PrimaryKeyToColumn, Schema};

/// One column of a registered entity
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    /// Column name
    pub name: String,
    /// Column type as declared on the entity
    pub column_type: ColumnType,
    /// Whether the column accepts NULL
    pub nullable: bool,
    /// Whether the column is part of the primary key
    pub primary_key: bool,
}

/// Kind of a declared association
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AssociationKind {
    /// Many-to-many through a join table
    BelongsToMany,
}

/// An association wired onto an [`EntityDefinition`] by the registry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Association {
    /// Kind of the association
    pub kind: AssociationKind,
    /// Plural name the association is reached by, e.g. `articles`
    pub name: String,
    /// Singular form of `name`, e.g. `article`
    pub singular: String,
    /// Model name of the other side
    pub target: String,
    /// Model name of the join table, if any
    pub through: Option<String>,
}

impl Association {
    /// Names of the accessors this association exposes on its source model.
    ///
    /// For `tag` belonging to many `articles` these are `get_articles`,
    /// `set_articles`, `add_article`, `add_articles`, `remove_article`,
    /// `remove_articles`, `has_article`, `has_articles`, `count_articles` and
    /// `create_article`.
    pub fn accessors(&self) -> Vec<String> {
        let plural = &self.name;
        let singular = &self.singular;
        match self.kind {
            AssociationKind::BelongsToMany => vec![
                format!("get_{plural}"),
                format!("set_{plural}"),
                format!("add_{singular}"),
                format!("add_{plural}"),
                format!("remove_{singular}"),
                format!("remove_{plural}"),
                format!("has_{singular}"),
                format!("has_{plural}"),
                format!("count_{plural}"),
                format!("create_{singular}"),
            ],
        }
    }

    /// Whether an accessor of this name is exposed
    pub fn has_accessor(&self, accessor: &str) -> bool {
        self.accessors().iter().any(|a| a == accessor)
    }
}

/// A registered entity: its model name, table, attributes and associations
#[derive(Clone, Debug)]
pub struct EntityDefinition {
    pub(crate) name: String,
    pub(crate) table_name: String,
    pub(crate) attributes: Vec<Attribute>,
    pub(crate) associations: Vec<Association>,
    pub(crate) table: TableCreateStatement,
}

impl EntityDefinition {
    pub(crate) fn from_entity<E>(name: &str, entity: E, schema: &Schema) -> Self
    where
        E: EntityTrait,
    {
        let primary_keys: Vec<String> = E::PrimaryKey::iter()
            .map(|pk| Iden::to_string(&pk.into_column()))
            .collect();
        let attributes = E::Column::iter()
            .map(|col| {
                let def = col.def();
                let name = Iden::to_string(&col);
                Attribute {
                    primary_key: primary_keys.contains(&name),
                    name,
                    column_type: def.get_column_type().clone(),
                    nullable: def.is_null(),
                }
            })
            .collect();

        Self {
            name: name.to_owned(),
            table_name: entity.table_name().to_owned(),
            attributes,
            associations: Vec::new(),
            table: schema.create_table_from_entity(entity),
        }
    }

    /// Model name, e.g. `tag`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table name, e.g. `tags`
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn associations(&self) -> &[Association] {
        &self.associations
    }

    /// Look up an association by its name, e.g. `articles`
    pub fn association(&self, name: &str) -> Option<&Association> {
        self.associations.iter().find(|a| a.name == name)
    }

    /// All associations whose other side is the model `target`
    pub fn associations_to<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a Association> {
        self.associations.iter().filter(move |a| a.target == target)
    }

    /// The `CREATE TABLE` statement for this entity
    pub fn table(&self) -> &TableCreateStatement {
        &self.table
    }
}
