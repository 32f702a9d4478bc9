pub use super::article::Entity as Article;
pub use super::articles_tags::Entity as ArticlesTags;
pub use super::tag::Entity as Tag;
