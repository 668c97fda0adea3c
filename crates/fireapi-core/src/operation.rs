//! The fixed set of KVM API operations and the requests they map to.
//!
//! Both the async and the blocking clients go through [`ApiRequest`], so an
//! operation is turned into a method, URL and body in exactly one place.

use crate::error::{Error, Result};
use crate::query::QueryParams;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Remote actions exposed by the KVM API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    /// Read the server configuration
    GetConfig,
    /// Read the current power state and resource usage
    GetStatus,
    /// Power the server on
    Start,
    /// Power the server off
    Stop,
    /// Restart the server
    Restart,
    /// Start a backup task with a description
    CreateBackup,
    /// Delete a backup by id
    DeleteBackup,
    /// List existing backups
    ListBackups,
    /// Read monitoring timings (CPU, memory, ping samples)
    GetMonitoringTimings,
    /// Read monitoring incidents and availability statistics
    GetMonitoringIncidents,
}

impl Operation {
    /// Returns the operation name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GetConfig => "get-config",
            Self::GetStatus => "get-status",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::CreateBackup => "create-backup",
            Self::DeleteBackup => "delete-backup",
            Self::ListBackups => "list-backups",
            Self::GetMonitoringTimings => "get-monitoring-timings",
            Self::GetMonitoringIncidents => "get-monitoring-incidents",
        }
    }

    /// Returns all operations.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::GetConfig,
            Self::GetStatus,
            Self::Start,
            Self::Stop,
            Self::Restart,
            Self::CreateBackup,
            Self::DeleteBackup,
            Self::ListBackups,
            Self::GetMonitoringTimings,
            Self::GetMonitoringIncidents,
        ]
    }

    /// HTTP method used by the operation.
    #[must_use]
    pub fn method(&self) -> Method {
        match self {
            Self::GetConfig
            | Self::GetStatus
            | Self::ListBackups
            | Self::GetMonitoringTimings
            | Self::GetMonitoringIncidents => Method::GET,
            Self::Start | Self::Stop | Self::Restart | Self::CreateBackup => Method::POST,
            Self::DeleteBackup => Method::DELETE,
        }
    }

    /// Endpoint path relative to the API base URL.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::GetConfig => "config",
            Self::GetStatus => "status",
            Self::Start => "status/start",
            Self::Stop => "status/stop",
            Self::Restart => "status/restart",
            Self::CreateBackup => "backup/create",
            Self::DeleteBackup => "backup/delete",
            Self::ListBackups => "backup/list",
            Self::GetMonitoringTimings => "monitoring/timings",
            Self::GetMonitoringIncidents => "monitoring/incidences",
        }
    }

    /// Whether the operation takes a string parameter.
    #[must_use]
    pub const fn takes_parameter(&self) -> bool {
        matches!(self, Self::CreateBackup | Self::DeleteBackup)
    }

}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::all()
            .iter()
            .copied()
            .find(|op| op.name() == wanted)
            .ok_or_else(|| Error::ValidationError(format!("Unknown operation: {s}")))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A fully described request for one operation, independent of the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    operation: Operation,
    query: QueryParams,
    body: Option<Value>,
}

impl ApiRequest {
    /// Request for an operation without parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] for operations that need a parameter;
    /// use [`ApiRequest::create_backup`] or [`ApiRequest::delete_backup`].
    pub fn new(operation: Operation) -> Result<Self> {
        if operation.takes_parameter() {
            return Err(Error::ValidationError(format!(
                "{operation} requires a parameter"
            )));
        }
        Ok(Self {
            operation,
            query: QueryParams::new(),
            body: None,
        })
    }

    /// Request for a backup with the given description.
    #[must_use]
    pub fn create_backup(description: &str) -> Self {
        Self {
            operation: Operation::CreateBackup,
            query: QueryParams::new(),
            body: Some(json!({ "description": description })),
        }
    }

    /// Request deleting the backup with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] if the id is blank.
    pub fn delete_backup(backup_id: &str) -> Result<Self> {
        if backup_id.trim().is_empty() {
            return Err(Error::ValidationError(
                "backup id must not be empty".to_string(),
            ));
        }

        let mut query = QueryParams::new();
        query.push("backup_id", backup_id);
        Ok(Self {
            operation: Operation::DeleteBackup,
            query,
            body: None,
        })
    }

    /// Request for any operation, with the parameter it takes (description
    /// for create-backup, id for delete-backup).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] if a parameter is missing, blank
    /// where an id is expected, or given to an operation that takes none.
    pub fn for_operation(operation: Operation, parameter: Option<&str>) -> Result<Self> {
        match (operation, parameter) {
            (Operation::CreateBackup, Some(description)) => Ok(Self::create_backup(description)),
            (Operation::DeleteBackup, Some(backup_id)) => Self::delete_backup(backup_id),
            (op, None) => Self::new(op),
            (op, Some(_)) => Err(Error::ValidationError(format!(
                "{op} does not take a parameter"
            ))),
        }
    }

    /// The operation this request performs.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    /// HTTP method of the request.
    #[must_use]
    pub fn method(&self) -> Method {
        self.operation.method()
    }

    /// JSON body, if the operation sends one.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Resolve the request URL against `base`, which must end with `/`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] if the path cannot be joined.
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base.join(self.operation.path())?;
        self.query.apply_to(&mut url);
        Ok(url)
    }
}
