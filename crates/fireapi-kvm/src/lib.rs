//! Clients and response models for the 24Fire KVM REST API.
//!
//! [`KvmClient`] is the async client, [`BlockingKvmClient`] the blocking one.
//! Both return the API's JSON verbatim; [`models`] offers typed views of it.
//!
//! ```no_run
//! use fireapi_kvm::{KvmApi, KvmClient};
//!
//! # async fn example() -> fireapi_kvm::Result<()> {
//! let client = KvmClient::new("your-api-key")?;
//! let config = client.get_config().await?;
//! println!("{}", config["data"]["hostsystem"]["processor"]);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod blocking;
pub mod client;
pub mod models;

pub use blocking::{BlockingKvmApi, BlockingKvmClient};
pub use client::{KvmApi, KvmClient, KvmClientBuilder};
pub use fireapi_core::{ApiRequest, Error, FireConfig, Operation};
pub use models::{
    ApiEnvelope, AvailabilityWindow, Backup, BackupCreated, Incidence, MonitoringIncidences,
    MonitoringTimings, ResourceUsage, TimingSample, UsageMetric, VmConfig, VmSettings, VmStatus,
};

/// Convenient result alias that reuses the shared 24Fire error type.
pub type Result<T> = fireapi_core::Result<T>;
