pub mod cache;
pub mod library;
pub mod postgres;

mod macros;

pub use cache::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
pub use library::{validate_user_id, InMemoryLibrary, UserLibrary};
pub use postgres::{create_pool, PgLibrary};
