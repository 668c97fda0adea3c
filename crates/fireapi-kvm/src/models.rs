//! Typed views over KVM API responses.
//!
//! The clients return raw JSON. These models are an opt-in way to read it:
//! every field is optional because the backup and monitoring payloads have
//! only been observed in documentation examples, not verified against a live
//! '24fire+' account.

use chrono::{DateTime, Utc};
use fireapi_core::ids::{BackupId, RequestId};
use fireapi_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Outer object wrapping every KVM API response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiEnvelope<T> {
    /// `success` or an error marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Server-side request id.
    #[serde(
        rename = "requestID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub request_id: Option<RequestId>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Operation-specific payload; a missing field reads as `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: DeserializeOwned> ApiEnvelope<T> {
    /// Decode a raw response value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] if the value does not have the
    /// expected shape.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| {
            Error::MalformedResponse(format!("Unexpected response shape: {e}"))
        })
    }
}

impl<T> ApiEnvelope<T> {
    /// Whether the API reported `status: success`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("success"))
    }

    /// Take the payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] when `data` is missing or null.
    pub fn into_data(self) -> Result<T> {
        self.data
            .ok_or_else(|| Error::MalformedResponse("response carries no data".to_string()))
    }
}

/// Payload of `config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VmConfig {
    /// Physical host the VM runs on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostsystem: Option<HostSystem>,
    /// VM settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<VmSettings>,
}

/// Host system description.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HostSystem {
    /// Datacenter location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacenter: Option<Datacenter>,
    /// Host group name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Node name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    /// CPU model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
    /// Memory type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    /// Storage model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nvme_hard_drives: Option<String>,
}

/// Datacenter location.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Datacenter {
    /// Operator name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// City.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// VM resource and access settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VmSettings {
    /// vCPU count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<u32>,
    /// Memory in MiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem: Option<u64>,
    /// Disk size in GiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<u64>,
    /// Installed operating system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<OperatingSystem>,
    /// Login user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Login password. Never serialized back out.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// Hostname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Network speed in Mbit/s.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_speed: Option<u64>,
    /// Number of backup slots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_slots: Option<u32>,
    /// IPv4 assignments.
    #[serde(default)]
    pub ipv4: Vec<Ipv4Assignment>,
    /// IPv6 assignments.
    #[serde(default)]
    pub ipv6: Vec<Ipv6Assignment>,
}

/// Operating system identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OperatingSystem {
    /// Machine name, e.g. `debian_11`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displayname: Option<String>,
}

/// IPv4 address assignment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ipv4Assignment {
    /// Address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_gateway: Option<String>,
    /// DDoS protection profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ddos_protection: Option<String>,
    /// Reverse DNS name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rdns: Option<String>,
}

/// IPv6 address assignment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ipv6Assignment {
    /// Address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_gateway: Option<String>,
    /// Set when the address only becomes active after a restart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_restart: Option<bool>,
}

/// Payload of `status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VmStatus {
    /// Power state, e.g. `running`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Uptime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// Task in progress, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<Value>,
    /// Current resource usage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<ResourceUsage>,
}

impl VmStatus {
    /// Whether the VM reports itself as running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status.as_deref() == Some("running")
    }
}

/// Resource usage block of `status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResourceUsage {
    /// CPU usage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<UsageMetric>,
    /// Memory usage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem: Option<UsageMetric>,
    /// Storage usage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nvme_storage: Option<UsageMetric>,
}

/// A value with its unit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UsageMetric {
    /// Reading; sent as a string or a number depending on the metric.
    #[serde(default)]
    pub data: Value,
    /// Unit, e.g. `%` or `GB`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl UsageMetric {
    /// Numeric reading.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        numeric(&self.data)
    }
}

/// A backup as listed by `backup/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Backup {
    /// Backup id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_id: Option<BackupId>,
    /// OS captured in the backup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_os: Option<String>,
    /// Description given at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_description: Option<String>,
    /// Size in MiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Task state, e.g. `finished`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Backup {
    /// Whether the backup task has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status.as_deref() == Some("finished")
    }
}

/// Payload of `backup/create`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BackupCreated {
    /// Id of the backup being created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_id: Option<BackupId>,
}

/// Payload of `monitoring/timings`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonitoringTimings {
    /// Samples, newest last.
    #[serde(default)]
    pub timings: Vec<TimingSample>,
}

/// One monitoring sample.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TimingSample {
    /// Sample time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// CPU load (string or number).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<Value>,
    /// Memory use (string or number).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem: Option<Value>,
    /// Ping in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ping: Option<u64>,
}

impl TimingSample {
    /// CPU load as a number.
    #[must_use]
    pub fn cpu_value(&self) -> Option<f64> {
        self.cpu.as_ref().and_then(numeric)
    }

    /// Memory use as a number.
    #[must_use]
    pub fn mem_value(&self) -> Option<f64> {
        self.mem.as_ref().and_then(numeric)
    }
}

/// Payload of `monitoring/incidences`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonitoringIncidences {
    /// Availability statistics keyed by window, e.g. `LAST_24_HOURS`.
    #[serde(default)]
    pub statistic: HashMap<String, AvailabilityWindow>,
    /// Individual incidents, newest first.
    #[serde(default)]
    pub incidences: Vec<Incidence>,
}

impl MonitoringIncidences {
    /// Statistics for one window name.
    #[must_use]
    pub fn window(&self, name: &str) -> Option<&AvailabilityWindow> {
        self.statistic.get(name)
    }
}

/// Availability statistics over one time window.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AvailabilityWindow {
    /// Total downtime in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downtime: Option<u64>,
    /// Availability percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<f64>,
    /// Number of incidents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incidences: Option<u64>,
    /// Longest incident in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longest_incidence: Option<u64>,
    /// Average incident length in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_incidence: Option<f64>,
}

/// A single outage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Incidence {
    /// Outage start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    /// Outage end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    /// Downtime in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downtime: Option<u64>,
    /// Cause, e.g. `PING_TIMEOUT` or `VM_STOPPED`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
