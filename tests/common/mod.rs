#![allow(dead_code)]

use article_tags::{
    bootstrap,
    entity::{article, tag},
    DatabaseConfig, Mutation, Registry,
};
use sea_orm::DatabaseConnection;

pub struct TestContext {
    pub db: DatabaseConnection,
    pub registry: Registry,
}

impl TestContext {
    pub async fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let config = DatabaseConfig {
            url: "sqlite::memory:".to_owned(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let (db, registry) = bootstrap(&config).await.unwrap();

        Self { db, registry }
    }

    pub async fn tag(&self, name: &str) -> tag::Model {
        Mutation::create_tag(&self.db, Some(name.to_owned()))
            .await
            .unwrap()
    }

    pub async fn article(&self, title: &str) -> article::Model {
        Mutation::create_article(&self.db, Some(title.to_owned()))
            .await
            .unwrap()
    }
}
