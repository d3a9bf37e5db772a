//! # dsfhub-client
//!
//! Resource client for DSF Hub integrations:
//! - HTTP transport with bearer authentication and per-segment escaping
//! - Envelope codec normalizing both response shapes into one verdict
//! - One generic `ResourceClient` driven by per-kind metadata
//! - The `ciphertrust` and `classification` kinds
//!
//! ```no_run
//! use dsfhub_client::HubClient;
//! use dsfhub_core::{Configuration, HubSettings};
//!
//! # async fn run() -> dsfhub_core::Result<()> {
//! let hub = HubClient::from_settings(HubSettings::load(None)?)?;
//! hub.verify().await?;
//!
//! let config = Configuration::new()
//!     .with("type", "AWS S3")
//!     .with("display_name", "classifier")
//!     .with_group(
//!         "storage_details",
//!         [Configuration::new().with_group(
//!             "s3_bucket_configuration",
//!             [Configuration::new()
//!                 .with("bucket_name", "b1")
//!                 .with("aws_region", "us-east-1")],
//!         )],
//!     );
//! let created = hub.classification().create_from(&config).await?;
//! println!("created {:?}", created.id());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod context;
pub mod envelope;
pub mod hub;
pub mod kinds;
pub mod payload;
pub mod transport;

pub use client::ResourceClient;
pub use context::CallContext;
pub use envelope::{Envelope, EnvelopeFamily, Verdict};
pub use hub::HubClient;
pub use kinds::ciphertrust::CiphertrustAttributes;
pub use kinds::classification::{
    ClassificationAttributes, DatabaseDetail, S3BucketConfiguration, StorageDetail,
};
pub use kinds::{KindSpec, ListingFilter};
pub use payload::ResourcePayload;
pub use transport::{HttpTransport, HubRequest, Method, RawResponse, Transport, TransportError};

pub use tokio_util::sync::CancellationToken;
