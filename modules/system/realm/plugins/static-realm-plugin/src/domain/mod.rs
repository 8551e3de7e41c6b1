//! Domain layer for the static realm.

pub mod cache;
pub mod password;
pub mod realm;

pub use cache::{InMemoryCache, InMemoryCacheManager};
pub use password::SaltedSha256PasswordService;
pub use realm::StaticRealm;
