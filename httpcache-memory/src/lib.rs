#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod builder;
mod config;
mod metadata;
mod scheduler;
mod store;

pub use builder::MemoryStoreBuilder;
pub use config::MemoryStoreConfig;
pub use metadata::ItemMetadata;
pub use store::MemoryStore;
