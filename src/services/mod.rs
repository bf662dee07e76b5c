// Service exports
pub mod cache;
pub mod llm;
pub mod matching;
pub mod postgres;
pub mod store;

pub use cache::{CacheBackend, CacheError, CacheKey, CacheManager, MemoryBackend, RedisBackend};
pub use llm::LlmReasoningClient;
pub use matching::{MatchingError, MatchingService};
pub use postgres::PostgresClient;
pub use store::{ProfileStore, StoreError};
