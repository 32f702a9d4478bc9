pub mod common;

use article_tags::{
    entity::{article, articles_tags, tag},
    Error, Mutation, Query,
};
use common::TestContext;
use pretty_assertions::assert_eq;
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, PaginatorTrait, TransactionTrait};

fn ids<M, F: Fn(&M) -> i32>(models: &[M], f: F) -> Vec<i32> {
    models.iter().map(f).collect()
}

#[tokio::test]
async fn add_article_links_exactly_once() {
    let ctx = TestContext::new().await;
    let tag = ctx.tag("rust").await;
    let article = ctx.article("Ownership").await;

    assert!(Mutation::add_article(&ctx.db, tag.id, article.id)
        .await
        .unwrap());
    // adding the same pair again leaves it alone
    assert!(!Mutation::add_article(&ctx.db, tag.id, article.id)
        .await
        .unwrap());

    let articles = Query::get_articles(&ctx.db, tag.id).await.unwrap();
    assert_eq!(articles, vec![article.clone()]);
    assert_eq!(Query::count_articles(&ctx.db, tag.id).await.unwrap(), 1);
    assert_eq!(articles_tags::Entity::find().count(&ctx.db).await.unwrap(), 1);

    // the inverse direction sees the same link
    let tags = Query::get_tags(&ctx.db, article.id).await.unwrap();
    assert_eq!(ids(&tags, |t: &tag::Model| t.id), vec![tag.id]);

    // and so does SeaORM's own navigation
    let related = tag
        .find_related(article::Entity)
        .all(&ctx.db)
        .await
        .unwrap();
    assert_eq!(related, vec![article]);
}

#[tokio::test]
async fn remove_article_deletes_one_join_row() {
    let ctx = TestContext::new().await;
    let tag = ctx.tag("rust").await;
    let first = ctx.article("Ownership").await;
    let second = ctx.article("Lifetimes").await;

    Mutation::add_articles(&ctx.db, tag.id, &[first.id, second.id])
        .await
        .unwrap();
    assert_eq!(articles_tags::Entity::find().count(&ctx.db).await.unwrap(), 2);

    let removed = Mutation::remove_article(&ctx.db, tag.id, first.id)
        .await
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(articles_tags::Entity::find().count(&ctx.db).await.unwrap(), 1);

    // both sides of the removed link survive
    assert!(Query::find_tag_by_id(&ctx.db, tag.id).await.unwrap().is_some());
    assert!(Query::find_article_by_id(&ctx.db, first.id)
        .await
        .unwrap()
        .is_some());

    assert!(!Query::has_article(&ctx.db, tag.id, first.id).await.unwrap());
    assert!(Query::has_article(&ctx.db, tag.id, second.id).await.unwrap());

    // removing it again is a no-op
    assert_eq!(
        Mutation::remove_article(&ctx.db, tag.id, first.id)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn add_and_remove_many() {
    let ctx = TestContext::new().await;
    let tag = ctx.tag("rust").await;
    let a = ctx.article("A").await;
    let b = ctx.article("B").await;
    let c = ctx.article("C").await;

    let added = Mutation::add_articles(&ctx.db, tag.id, &[a.id, b.id, b.id])
        .await
        .unwrap();
    assert_eq!(added, 2);

    let added = Mutation::add_articles(&ctx.db, tag.id, &[b.id, c.id])
        .await
        .unwrap();
    assert_eq!(added, 1);

    assert!(Query::has_articles(&ctx.db, tag.id, &[a.id, b.id, c.id])
        .await
        .unwrap());
    assert!(Query::has_articles(&ctx.db, tag.id, &[]).await.unwrap());

    let removed = Mutation::remove_articles(&ctx.db, tag.id, &[a.id, c.id])
        .await
        .unwrap();
    assert_eq!(removed, 2);
    assert!(!Query::has_articles(&ctx.db, tag.id, &[a.id, b.id])
        .await
        .unwrap());
    assert_eq!(
        ids(
            &Query::get_articles(&ctx.db, tag.id).await.unwrap(),
            |m: &article::Model| m.id
        ),
        vec![b.id]
    );
}

#[tokio::test]
async fn set_articles_replaces_the_set() {
    let ctx = TestContext::new().await;
    let tag = ctx.tag("rust").await;
    let a = ctx.article("A").await;
    let b = ctx.article("B").await;
    let c = ctx.article("C").await;

    Mutation::add_articles(&ctx.db, tag.id, &[a.id, b.id])
        .await
        .unwrap();

    let (added, removed) = Mutation::set_articles(&ctx.db, tag.id, &[b.id, c.id])
        .await
        .unwrap();
    assert_eq!((added, removed), (1, 1));
    assert_eq!(
        ids(
            &Query::get_articles(&ctx.db, tag.id).await.unwrap(),
            |m: &article::Model| m.id
        ),
        vec![b.id, c.id]
    );

    let (added, removed) = Mutation::set_articles(&ctx.db, tag.id, &[]).await.unwrap();
    assert_eq!((added, removed), (0, 2));
    assert_eq!(Query::count_articles(&ctx.db, tag.id).await.unwrap(), 0);

    // articles are never deleted by unlinking
    assert_eq!(article::Entity::find().count(&ctx.db).await.unwrap(), 3);
}

#[tokio::test]
async fn set_articles_rolls_back_on_unknown_article() {
    let ctx = TestContext::new().await;
    let tag = ctx.tag("rust").await;
    let a = ctx.article("A").await;

    Mutation::add_article(&ctx.db, tag.id, a.id).await.unwrap();

    let err = Mutation::set_articles(&ctx.db, tag.id, &[404])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ArticleNotFound(404)));

    // the removal of `a` happened inside the failed transaction
    assert!(Query::has_article(&ctx.db, tag.id, a.id).await.unwrap());
}

#[tokio::test]
async fn deleting_a_side_removes_its_links() {
    let ctx = TestContext::new().await;
    let rust = ctx.tag("rust").await;
    let async_ = ctx.tag("async").await;
    let article = ctx.article("Pinning").await;

    Mutation::add_article(&ctx.db, rust.id, article.id)
        .await
        .unwrap();
    Mutation::add_article(&ctx.db, async_.id, article.id)
        .await
        .unwrap();

    Mutation::delete_tag(&ctx.db, rust.id).await.unwrap();
    assert_eq!(articles_tags::Entity::find().count(&ctx.db).await.unwrap(), 1);
    assert!(Query::find_article_by_id(&ctx.db, article.id)
        .await
        .unwrap()
        .is_some());

    Mutation::delete_article(&ctx.db, article.id).await.unwrap();
    assert_eq!(articles_tags::Entity::find().count(&ctx.db).await.unwrap(), 0);
    assert!(Query::find_tag_by_id(&ctx.db, async_.id)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn create_article_for_tag() {
    let ctx = TestContext::new().await;
    let tag = ctx.tag("rust").await;

    let article = Mutation::create_article_for_tag(&ctx.db, tag.id, Some("Traits".to_owned()))
        .await
        .unwrap();
    assert_eq!(article.title.as_deref(), Some("Traits"));
    assert_eq!(
        Query::get_articles(&ctx.db, tag.id).await.unwrap(),
        vec![article]
    );

    let err = Mutation::create_article_for_tag(&ctx.db, 404, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TagNotFound(404)));
    assert_eq!(article::Entity::find().count(&ctx.db).await.unwrap(), 1);
}

#[tokio::test]
async fn unknown_sides_are_reported() {
    let ctx = TestContext::new().await;
    let tag = ctx.tag("rust").await;
    let article = ctx.article("A").await;

    let err = Mutation::add_article(&ctx.db, 404, article.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TagNotFound(404)));

    let err = Mutation::add_article(&ctx.db, tag.id, 404)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ArticleNotFound(404)));

    let err = Query::get_articles(&ctx.db, 404).await.unwrap_err();
    assert!(matches!(err, Error::TagNotFound(404)));

    let err = Query::get_tags(&ctx.db, 404).await.unwrap_err();
    assert!(matches!(err, Error::ArticleNotFound(404)));

    assert_eq!(articles_tags::Entity::find().count(&ctx.db).await.unwrap(), 0);
}

#[tokio::test]
async fn add_article_tolerates_an_existing_row() {
    let ctx = TestContext::new().await;
    let tag = ctx.tag("rust").await;
    let article = ctx.article("Ownership").await;

    // the row lands without going through `add_article`, as a concurrent caller would
    articles_tags::ActiveModel::link(article.id, tag.id)
        .insert(&ctx.db)
        .await
        .unwrap();

    assert!(!Mutation::add_article(&ctx.db, tag.id, article.id)
        .await
        .unwrap());
    assert_eq!(
        Mutation::add_articles(&ctx.db, tag.id, &[article.id])
            .await
            .unwrap(),
        0
    );
    assert_eq!(articles_tags::Entity::find().count(&ctx.db).await.unwrap(), 1);
}

#[tokio::test]
async fn mutations_join_the_callers_transaction() {
    let ctx = TestContext::new().await;
    let tag = ctx.tag("rust").await;

    let txn = ctx.db.begin().await.unwrap();
    let article = Mutation::create_article(&txn, Some("Drafts".to_owned()))
        .await
        .unwrap();
    assert!(Mutation::add_article(&txn, tag.id, article.id)
        .await
        .unwrap());
    Mutation::update_tag_name(&txn, tag.id, Some("renamed".to_owned()))
        .await
        .unwrap();
    assert_eq!(Query::count_articles(&txn, tag.id).await.unwrap(), 1);
    txn.rollback().await.unwrap();

    // nothing survives the rollback
    assert_eq!(article::Entity::find().count(&ctx.db).await.unwrap(), 0);
    assert_eq!(articles_tags::Entity::find().count(&ctx.db).await.unwrap(), 0);
    let found = Query::find_tag_by_id(&ctx.db, tag.id).await.unwrap().unwrap();
    assert_eq!(found.name.as_deref(), Some("rust"));

    let kept = ctx.article("Kept").await;
    let txn = ctx.db.begin().await.unwrap();
    Mutation::add_article(&txn, tag.id, kept.id).await.unwrap();
    txn.commit().await.unwrap();
    assert_eq!(Query::count_articles(&ctx.db, tag.id).await.unwrap(), 1);
}
