//! Blocking KVM API client.
//!
//! Same requests, same decoding as [`KvmClient`](crate::KvmClient); only the
//! transport waits on the calling thread. Do not use it from inside an async
//! runtime.

use crate::client::KvmClientBuilder;
use crate::Result;
use fireapi_core::response::{decode_response, transport_error};
use fireapi_core::{ApiRequest, Operation};
use serde_json::Value;
use url::Url;

/// Blocking KVM API client.
#[derive(Debug, Clone)]
pub struct BlockingKvmClient {
    http: reqwest::blocking::Client,
    base_url: Url,
    log_requests: bool,
}

impl BlockingKvmClient {
    /// Construct a client for the public API with default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        KvmClientBuilder::new(api_key)?.build_blocking()
    }

    pub(crate) fn from_parts(
        http: reqwest::blocking::Client,
        base_url: Url,
        log_requests: bool,
    ) -> Self {
        Self {
            http,
            base_url,
            log_requests,
        }
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl BlockingKvmApi for BlockingKvmClient {
    fn execute(&self, request: ApiRequest) -> Result<Value> {
        let operation = request.operation();
        let url = request.url(&self.base_url)?;
        if self.log_requests {
            tracing::debug!(operation = %operation, method = %request.method(), url = %url, "sending 24Fire request");
        }

        let mut builder = self.http.request(request.method(), url);
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|err| transport_error(operation, err))?;
        let status = response.status();
        let body = response
            .bytes()
            .map_err(|err| transport_error(operation, err))?;

        if self.log_requests {
            tracing::debug!(operation = %operation, status = status.as_u16(), bytes = body.len(), "received 24Fire response");
        }
        decode_response(operation, status, &body)
    }
}

/// Blocking counterpart of [`KvmApi`](crate::KvmApi).
pub trait BlockingKvmApi {
    /// Send a prepared request and decode its response.
    fn execute(&self, request: ApiRequest) -> Result<Value>;

    /// Run any operation by value, with its parameter if it takes one.
    fn call(&self, operation: Operation, parameter: Option<&str>) -> Result<Value> {
        self.execute(ApiRequest::for_operation(operation, parameter)?)
    }

    /// Retrieve the server configuration.
    fn get_config(&self) -> Result<Value> {
        self.execute(ApiRequest::new(Operation::GetConfig)?)
    }

    /// Retrieve the power state and resource usage.
    fn get_status(&self) -> Result<Value> {
        self.execute(ApiRequest::new(Operation::GetStatus)?)
    }

    /// Power the server on.
    fn start_server(&self) -> Result<Value> {
        self.execute(ApiRequest::new(Operation::Start)?)
    }

    /// Power the server off.
    fn stop_server(&self) -> Result<Value> {
        self.execute(ApiRequest::new(Operation::Stop)?)
    }

    /// Restart the server.
    fn restart_server(&self) -> Result<Value> {
        self.execute(ApiRequest::new(Operation::Restart)?)
    }

    /// Start a backup with the given description ('24fire+' only).
    fn create_backup(&self, description: &str) -> Result<Value> {
        self.execute(ApiRequest::create_backup(description))
    }

    /// Delete a backup ('24fire+' only).
    fn delete_backup(&self, backup_id: &str) -> Result<Value> {
        self.execute(ApiRequest::delete_backup(backup_id)?)
    }

    /// List backups ('24fire+' only).
    fn list_backups(&self) -> Result<Value> {
        self.execute(ApiRequest::new(Operation::ListBackups)?)
    }

    /// Retrieve monitoring timings ('24fire+' only).
    fn monitoring_timings(&self) -> Result<Value> {
        self.execute(ApiRequest::new(Operation::GetMonitoringTimings)?)
    }

    /// Retrieve monitoring incidents ('24fire+' only).
    fn monitoring_incidences(&self) -> Result<Value> {
        self.execute(ApiRequest::new(Operation::GetMonitoringIncidents)?)
    }
}
