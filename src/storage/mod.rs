pub mod database;
pub mod metadata;

pub use database::{Database, PoolConfig, SharedDatabase};
pub use metadata::{MetadataStore, NewChunk, SqliteMetadataStore};
