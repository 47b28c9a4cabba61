pub mod lifecycle;
pub mod selector;
pub mod store;
pub mod version;
