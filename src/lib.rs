//! Accept-header content negotiation middleware
//!
//! Given the media types a server can produce, this crate parses an incoming
//! request's `Accept` header, selects the single best media type/format pair,
//! and sets the outgoing `Content-Type`. Media types may carry a `+format`
//! suffix (`application/vnd.shop.Order+json`) distinguishing serialization
//! variants of the same logical resource.
//!
//! # Example
//!
//! ```
//! use mediate::{AcceptMiddleware, MediaDescriptor, NegotiationConfig};
//!
//! let media = vec![
//!     MediaDescriptor::new("application/vnd.shop.Order").with_formats(["json", "xml"]),
//!     MediaDescriptor::new("text/plain"),
//! ];
//!
//! // Fall back to the first declared pair when nothing matches.
//! let accept = AcceptMiddleware::new(&media)?;
//!
//! // Or reject unmatched requests with 406 Not Acceptable.
//! let strict = AcceptMiddleware::with_config(
//!     &media,
//!     NegotiationConfig::builder().strict_mode(true).build(),
//! )?;
//! # Ok::<(), mediate::Error>(())
//! ```
//!
//! # Selection rules
//!
//! Matching is exact on `(content type, format)` pairs; wildcard ranges are
//! not supported. Declaration order is server preference order, and among
//! all mutually acceptable pairs the first declared one wins, regardless of
//! client quality factors. Parsing is lenient and total: malformed ranges
//! and quality values degrade instead of failing the request.

pub mod accept;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod negotiate;

pub use accept::AcceptEntry;
pub use catalog::{MediaCatalog, MediaDescriptor, MediaPair};
pub use config::{
    default_config, set_default_config, set_default_option, NegotiationConfig,
    NegotiationConfigBuilder,
};
pub use error::Error;
pub use http::{Extensions, HttpRequest, HttpResponse};
pub use middleware::{
    AcceptMiddleware, HandlerFn, Middleware, MiddlewareChain, NegotiatedMedia, Next,
};
pub use negotiate::{negotiate, NegotiationResult};

/// Result type for negotiation operations
pub type Result<T> = std::result::Result<T, Error>;
