#![warn(missing_docs)]

//! Options for clients of S3-compatible object storage.
//!
//! [`Options`] collects the settings a storage backend needs: credentials,
//! region, endpoints, addressing style, presign expiry, upload buffer size,
//! transport and the headers to keep out of request signatures. Several
//! partial option sets (defaults, config file, environment, ...) can be
//! layered with [`Options::new`]. The merged set is checked with
//! [`Options::validate`] and then projected with [`Options::s3_options`]
//! onto:
//!
//! - [`ClientOptions`], applied to the `aws-sdk-s3` config builder of the
//!   client used for API calls, and
//! - [`PresignOptions`], which carries the expiry and the public endpoint
//!   presigned URLs should point at.
//!
//! # Example
//!
//! ```no_run
//! use aws_sdk_s3::config::BehaviorVersion;
//! use s3_options::{Options, PlatformRoots};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = Options::new([
//!     Options::default()
//!         .with_region("auto")
//!         .with_uri("https://storage.googleapis.com"),
//!     Options::default().with_unsigned_headers(["Accept-Encoding"]),
//! ]);
//! options.validate()?;
//!
//! let (client_options, presign_options) = options.s3_options(&PlatformRoots::default())?;
//!
//! let config = client_options
//!     .apply(aws_sdk_s3::Config::builder().behavior_version(BehaviorVersion::latest()))
//!     .build();
//! let client = aws_sdk_s3::Client::from_conf(config.clone());
//! let presigner = presign_options.presign_client(&config);
//!
//! let url = presigner
//!     .get_object()
//!     .bucket("artifacts")
//!     .key("release.tar.gz")
//!     .presigned(presign_options.presigning_config()?)
//!     .await?;
//! # let _ = (client, url);
//! # Ok(())
//! # }
//! ```

mod adapter;
pub use adapter::*;

mod credentials;
pub use credentials::*;

mod endpoint;
pub use endpoint::*;

mod error;
pub use error::*;

mod options;
pub use options::*;

mod roots;
pub use roots::*;

pub use s3_unsigned_headers::{HeaderNames, UnsignedHeaders};
