#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod body;
mod capture;
mod error;
pub mod marker;
mod spill;
pub mod wire;

pub use body::CacheBody;
pub use capture::{CaptureBody, OnComplete};
pub use error::{SpillError, WireError};
pub use marker::CachedResponseExt;
pub use spill::{SpillBuffer, SpillReader};
