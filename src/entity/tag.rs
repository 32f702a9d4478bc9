use crate::registry::RegistryBuilder;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

/// Name this entity is registered under
pub const MODEL_NAME: &str = "tag";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub name: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::articles_tags::Entity")]
    ArticlesTags,
}

impl Related<super::articles_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArticlesTags.def()
    }
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        super::articles_tags::Relation::Article.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::articles_tags::Relation::Tag.def().rev())
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now();
        if insert && self.created_at.is_not_set() {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}

/// Registers the `tag` entity and its `name` attribute.
pub fn init(builder: RegistryBuilder) -> RegistryBuilder {
    builder.register(MODEL_NAME, Entity)
}

/// Declares that a tag belongs to many articles through `articles_tags`.
///
/// The declaration is resolved when the builder is built, so it does not matter
/// whether `article` has been registered yet.
pub fn associate(builder: RegistryBuilder) -> RegistryBuilder {
    builder.belongs_to_many(
        MODEL_NAME,
        super::article::MODEL_NAME,
        super::articles_tags::MODEL_NAME,
    )
}
