#![warn(missing_docs)]

//! Keep selected headers out of the request signature.
//!
//! Some S3-compatible backends (Google Cloud Storage among them) reject a
//! SigV4 signature that covers headers such as `Accept-Encoding`, which
//! proxies are free to rewrite in flight. [`UnsignedHeaders`] wraps the
//! SigV4 auth scheme: its signer lifts the configured headers off a request,
//! signs what is left and puts them back, so the server still receives them.
//!
//! ```text
//! ... -> sign { strip -> SigV4 -> restore } -> transmit -> ...
//! ```
//!
//! The lifted values live on the stack of a single signing call, so
//! concurrent requests going through one client never see each other's
//! headers, and no interceptor ever observes the request without them.
//!
//! # Example
//!
//! ```
//! use s3_unsigned_headers::UnsignedHeaders;
//!
//! let scheme = UnsignedHeaders::new(["Accept-Encoding"]);
//! assert!(scheme.names().contains("accept-encoding"));
//!
//! let config = aws_sdk_s3::Config::builder()
//!     .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
//!     .push_auth_scheme(scheme)
//!     .build();
//! # let _ = config;
//! ```

mod headers;
pub use headers::*;

mod scheme;
pub use scheme::*;
