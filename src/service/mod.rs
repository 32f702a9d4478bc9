//! Tag CRUD and the accessors of the tag-article association, in the shape of
//! a `Query` / `Mutation` pair.

mod mutation;
mod query;

pub use mutation::*;
pub use query::*;
