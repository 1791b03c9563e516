#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
//!
//! ## Architecture
//!
//! The cache engine (in the `httpcache` crate) depends on exactly two
//! collaborators: an outbound transport and a [`Store`]. Everything the
//! engine needs to decide *whether* a stored response can be reused lives
//! here:
//!
//! - **Parse** request and response directives ([`CacheControl`])
//! - **Read** the response timestamp ([`parse_http_date`])
//! - **Classify** the cached entry ([`classify`], [`Freshness`])
//! - **Persist** raw entries under a request key ([`Store`], [`Fingerprint`])

pub mod date;
pub mod directives;
pub mod error;
pub mod fingerprint;
pub mod freshness;
pub mod store;

pub use date::{format_http_date, parse_http_date};
pub use directives::CacheControl;
pub use error::{DateError, DirectiveError};
pub use fingerprint::Fingerprint;
pub use freshness::{Freshness, classify};
pub use store::{PutStatus, Store};

/// Raw bytes of a serialized cached response.
///
/// Using `Bytes` lets stores hand out copies of an entry by reference count.
pub type Raw = bytes::Bytes;
