pub mod map;
pub mod r#trait;
pub mod weak;

pub use map::MapStore;
pub use r#trait::KeyedStore;
pub use weak::WeakStore;
