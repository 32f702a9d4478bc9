use super::query::{require_article, require_tag, Query};
use crate::entity::prelude::{ArticlesTags, Tag};
use crate::entity::{article, articles_tags, tag};
use crate::Result;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, ConnectionTrait, DeleteResult,
    EntityTrait, ModelTrait, QueryFilter, Set, TransactionTrait,
};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Every method accepts a connection or an open transaction. Methods that
/// write more than one statement open a nested transaction on it.
#[derive(Debug)]
pub struct Mutation;

impl Mutation {
    #[instrument(skip(db))]
    pub async fn create_tag<C>(db: &C, name: Option<String>) -> Result<tag::Model>
    where
        C: ConnectionTrait,
    {
        let tag = tag::ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(db)
        .await?;
        debug!(tag_id = tag.id, "Created tag");
        Ok(tag)
    }

    #[instrument(skip(db))]
    pub async fn update_tag_name<C>(db: &C, id: i32, name: Option<String>) -> Result<tag::Model>
    where
        C: ConnectionTrait,
    {
        let mut tag: tag::ActiveModel = require_tag(db, id).await?.into();
        tag.name = Set(name);
        Ok(tag.update(db).await?)
    }

    /// Delete a tag together with its links. Articles are left alone.
    #[instrument(skip(db))]
    pub async fn delete_tag<C>(db: &C, id: i32) -> Result<DeleteResult>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;

        let tag = require_tag(&txn, id).await?;
        let unlinked = ArticlesTags::delete_many()
            .filter(articles_tags::Column::TagId.eq(id))
            .exec(&txn)
            .await?;
        let res = tag.delete(&txn).await?;

        txn.commit().await?;
        debug!(unlinked = unlinked.rows_affected, "Deleted tag");
        Ok(res)
    }

    pub async fn delete_all_tags<C>(db: &C) -> Result<DeleteResult>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        ArticlesTags::delete_many().exec(&txn).await?;
        let res = Tag::delete_many().exec(&txn).await?;
        txn.commit().await?;
        Ok(res)
    }

    #[instrument(skip(db))]
    pub async fn create_article<C>(db: &C, title: Option<String>) -> Result<article::Model>
    where
        C: ConnectionTrait,
    {
        Ok(insert_article(db, title).await?)
    }

    /// Delete an article together with its links. Tags are left alone.
    #[instrument(skip(db))]
    pub async fn delete_article<C>(db: &C, id: i32) -> Result<DeleteResult>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;

        let article = require_article(&txn, id).await?;
        ArticlesTags::delete_many()
            .filter(articles_tags::Column::ArticleId.eq(id))
            .exec(&txn)
            .await?;
        let res = article.delete(&txn).await?;

        txn.commit().await?;
        Ok(res)
    }

    /// Link an article to a tag. Returns `false` if they were already linked.
    #[instrument(skip(db))]
    pub async fn add_article<C>(db: &C, tag_id: i32, article_id: i32) -> Result<bool>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        require_tag(&txn, tag_id).await?;
        let added = link(&txn, tag_id, article_id).await?;
        txn.commit().await?;
        Ok(added)
    }

    /// Link several articles to a tag. Returns the number of new links.
    #[instrument(skip(db))]
    pub async fn add_articles<C>(db: &C, tag_id: i32, article_ids: &[i32]) -> Result<u64>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        require_tag(&txn, tag_id).await?;

        let mut added = 0;
        for article_id in article_ids.iter().copied().collect::<BTreeSet<_>>() {
            if link(&txn, tag_id, article_id).await? {
                added += 1;
            }
        }

        txn.commit().await?;
        Ok(added)
    }

    /// Replace the articles of a tag with exactly `article_ids`.
    /// Returns (links added, links removed).
    #[instrument(skip(db))]
    pub async fn set_articles<C>(db: &C, tag_id: i32, article_ids: &[i32]) -> Result<(u64, u64)>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        require_tag(&txn, tag_id).await?;

        let current = Query::linked_article_ids(&txn, tag_id).await?;
        let wanted: BTreeSet<i32> = article_ids.iter().copied().collect();

        let stale: Vec<i32> = current.difference(&wanted).copied().collect();
        let removed = unlink(&txn, tag_id, &stale).await?;

        let mut added = 0;
        for article_id in wanted.difference(&current).copied() {
            if link(&txn, tag_id, article_id).await? {
                added += 1;
            }
        }

        txn.commit().await?;
        debug!(added, removed, "Replaced articles of tag");
        Ok((added, removed))
    }

    /// Unlink an article from a tag. Returns the number of links removed, 0 or 1.
    #[instrument(skip(db))]
    pub async fn remove_article<C>(db: &C, tag_id: i32, article_id: i32) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        unlink(db, tag_id, &[article_id]).await
    }

    #[instrument(skip(db))]
    pub async fn remove_articles<C>(db: &C, tag_id: i32, article_ids: &[i32]) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        unlink(db, tag_id, article_ids).await
    }

    /// Create an article and link it to the tag, in one transaction
    #[instrument(skip(db))]
    pub async fn create_article_for_tag<C>(
        db: &C,
        tag_id: i32,
        title: Option<String>,
    ) -> Result<article::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = db.begin().await?;
        require_tag(&txn, tag_id).await?;

        let article = insert_article(&txn, title).await?;
        articles_tags::ActiveModel::link(article.id, tag_id)
            .insert(&txn)
            .await?;

        txn.commit().await?;
        Ok(article)
    }
}

async fn insert_article<C>(db: &C, title: Option<String>) -> Result<article::Model, sea_orm::DbErr>
where
    C: ConnectionTrait,
{
    article::ActiveModel {
        title: Set(title),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Insert the join row unless it exists. The tag is expected to exist.
///
/// An existing pair is left to the primary key, so a concurrent insert of the
/// same pair is reported as `false` instead of a constraint violation.
async fn link<C>(db: &C, tag_id: i32, article_id: i32) -> Result<bool>
where
    C: ConnectionTrait,
{
    require_article(db, article_id).await?;
    let inserted = ArticlesTags::insert(articles_tags::ActiveModel::link(article_id, tag_id))
        .on_conflict(
            OnConflict::columns([
                articles_tags::Column::ArticleId,
                articles_tags::Column::TagId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(inserted > 0)
}

async fn unlink<C>(db: &C, tag_id: i32, article_ids: &[i32]) -> Result<u64>
where
    C: ConnectionTrait,
{
    if article_ids.is_empty() {
        return Ok(0);
    }
    let res = ArticlesTags::delete_many()
        .filter(articles_tags::Column::TagId.eq(tag_id))
        .filter(articles_tags::Column::ArticleId.is_in(article_ids.iter().copied()))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
