pub mod lru;

pub use self::lru::LruStore;
