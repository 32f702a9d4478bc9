use crate::entity::prelude::{Article, ArticlesTags, Tag};
use crate::entity::{article, articles_tags, tag};
use crate::{Error, Result};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use std::collections::BTreeSet;

#[derive(Debug)]
pub struct Query;

impl Query {
    pub async fn find_tag_by_id<C>(db: &C, id: i32) -> Result<Option<tag::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(Tag::find_by_id(id).one(db).await?)
    }

    /// Tags with exactly this name. Names are not unique, so there may be several.
    pub async fn find_tags_by_name<C>(db: &C, name: &str) -> Result<Vec<tag::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(Tag::find()
            .filter(tag::Column::Name.eq(name))
            .order_by_asc(tag::Column::Id)
            .all(db)
            .await?)
    }

    /// If ok, returns (tag models, num pages). Pages start at 1, and page 0 is
    /// read as page 1. A page size of 0 is read as 1.
    pub async fn find_tags_in_page<C>(
        db: &C,
        page: u64,
        tags_per_page: u64,
    ) -> Result<(Vec<tag::Model>, u64)>
    where
        C: ConnectionTrait,
    {
        let paginator = Tag::find()
            .order_by_asc(tag::Column::Id)
            .paginate(db, tags_per_page.max(1));
        let num_pages = paginator.num_pages().await?;

        let tags = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((tags, num_pages))
    }

    pub async fn find_article_by_id<C>(db: &C, id: i32) -> Result<Option<article::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(Article::find_by_id(id).one(db).await?)
    }

    /// Articles associated with a tag, ordered by id
    pub async fn get_articles<C>(db: &C, tag_id: i32) -> Result<Vec<article::Model>>
    where
        C: ConnectionTrait,
    {
        let tag = require_tag(db, tag_id).await?;
        Ok(tag
            .find_related(Article)
            .order_by_asc(article::Column::Id)
            .all(db)
            .await?)
    }

    /// Tags associated with an article, ordered by id
    pub async fn get_tags<C>(db: &C, article_id: i32) -> Result<Vec<tag::Model>>
    where
        C: ConnectionTrait,
    {
        let article = require_article(db, article_id).await?;
        Ok(article
            .find_related(Tag)
            .order_by_asc(tag::Column::Id)
            .all(db)
            .await?)
    }

    pub async fn has_article<C>(db: &C, tag_id: i32, article_id: i32) -> Result<bool>
    where
        C: ConnectionTrait,
    {
        Ok(ArticlesTags::find_by_id((article_id, tag_id))
            .one(db)
            .await?
            .is_some())
    }

    /// Whether the tag is associated with every one of `article_ids`
    pub async fn has_articles<C>(db: &C, tag_id: i32, article_ids: &[i32]) -> Result<bool>
    where
        C: ConnectionTrait,
    {
        let wanted: BTreeSet<i32> = article_ids.iter().copied().collect();
        if wanted.is_empty() {
            return Ok(true);
        }
        let found = ArticlesTags::find()
            .filter(articles_tags::Column::TagId.eq(tag_id))
            .filter(articles_tags::Column::ArticleId.is_in(wanted.iter().copied()))
            .count(db)
            .await?;
        Ok(found == wanted.len() as u64)
    }

    pub async fn count_articles<C>(db: &C, tag_id: i32) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        Ok(ArticlesTags::find()
            .filter(articles_tags::Column::TagId.eq(tag_id))
            .count(db)
            .await?)
    }

    /// Ids of the articles linked to a tag, straight from the join table
    pub(crate) async fn linked_article_ids<C>(db: &C, tag_id: i32) -> Result<BTreeSet<i32>>
    where
        C: ConnectionTrait,
    {
        Ok(ArticlesTags::find()
            .filter(articles_tags::Column::TagId.eq(tag_id))
            .all(db)
            .await?
            .into_iter()
            .map(|link| link.article_id)
            .collect())
    }
}

pub(crate) async fn require_tag<C>(db: &C, id: i32) -> Result<tag::Model>
where
    C: ConnectionTrait,
{
    Tag::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::TagNotFound(id))
}

pub(crate) async fn require_article<C>(db: &C, id: i32) -> Result<article::Model>
where
    C: ConnectionTrait,
{
    Article::find_by_id(id)
        .one(db)
        .await?
        .ok_or(Error::ArticleNotFound(id))
}
