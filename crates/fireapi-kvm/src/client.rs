//! Asynchronous KVM API client implementation.

use crate::blocking::BlockingKvmClient;
use crate::Result;
use async_trait::async_trait;
use fireapi_core::client::ClientConfig;
use fireapi_core::response::{decode_response, transport_error};
use fireapi_core::{ApiRequest, FireConfig, Operation};
use serde_json::Value;
use std::time::Duration;
use url::Url;

pub(crate) const USER_AGENT: &str = concat!("fireapi-kvm/", env!("CARGO_PKG_VERSION"));

/// Builder for [`KvmClient`] and [`BlockingKvmClient`].
#[derive(Debug)]
pub struct KvmClientBuilder {
    config: FireConfig,
    http: ClientConfig,
    timeout: Option<Duration>,
}

impl KvmClientBuilder {
    /// Create a builder for the given API key, pointed at the public API.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self::from_config(FireConfig::new(api_key)?))
    }

    /// Create a builder from an existing configuration.
    #[must_use]
    pub fn from_config(config: FireConfig) -> Self {
        Self {
            config,
            http: ClientConfig::new().with_user_agent(USER_AGENT),
            timeout: None,
        }
    }

    /// Create a builder from `FIRE_API_KEY` and friends.
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(FireConfig::from_env()?))
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.config = self.config.with_base_url(url);
        self
    }

    /// Override the per-request timeout taken from [`FireConfig`].
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Replace the transport settings.
    ///
    /// The request timeout still comes from [`FireConfig`] (or
    /// [`with_timeout`](Self::with_timeout)), and the crate's user agent is
    /// used when `config` names none.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http = config;
        self
    }

    /// Build the async client.
    pub fn build(self) -> Result<KvmClient> {
        let (config, base_url) = self.validate()?;
        let settings = self.http_settings();
        let http = settings.build_async(&config.api_key)?;
        Ok(KvmClient {
            http,
            base_url,
            log_requests: settings.enable_logging,
        })
    }

    /// Build the blocking client.
    ///
    /// Must not be called from within an async runtime.
    pub fn build_blocking(self) -> Result<BlockingKvmClient> {
        let (config, base_url) = self.validate()?;
        let settings = self.http_settings();
        let http = settings.build_blocking(&config.api_key)?;
        Ok(BlockingKvmClient::from_parts(
            http,
            base_url,
            settings.enable_logging,
        ))
    }

    fn http_settings(&self) -> ClientConfig {
        let mut settings = self
            .http
            .clone()
            .with_timeout(self.timeout.unwrap_or_else(|| self.config.timeout()));
        if settings.user_agent.is_none() {
            settings.user_agent = Some(USER_AGENT.to_string());
        }
        settings
    }

    fn validate(&self) -> Result<(&FireConfig, Url)> {
        let base_url = self.config.parse_base_url()?;
        self.config.check()?;
        Ok((&self.config, base_url))
    }
}

/// Asynchronous KVM API client.
///
/// Cloning is cheap and clones share the underlying connection handle.
#[derive(Debug, Clone)]
pub struct KvmClient {
    http: reqwest::Client,
    base_url: Url,
    log_requests: bool,
}

impl KvmClient {
    /// Construct a client for the public API with default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        KvmClientBuilder::new(api_key)?.build()
    }

    /// Start building a client.
    pub fn builder(api_key: impl Into<String>) -> Result<KvmClientBuilder> {
        KvmClientBuilder::new(api_key)
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl KvmApi for KvmClient {
    async fn execute(&self, request: ApiRequest) -> Result<Value> {
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
            .await
            .map_err(|err| transport_error(operation, err))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| transport_error(operation, err))?;

        if self.log_requests {
            tracing::debug!(operation = %operation, status = status.as_u16(), bytes = body.len(), "received 24Fire response");
        }
        decode_response(operation, status, &body)
    }
}

/// The KVM API surface, one method per remote operation.
///
/// Implementors only provide [`KvmApi::execute`]; the operation methods build
/// the matching [`ApiRequest`] and hand it over.
#[async_trait]
pub trait KvmApi: Send + Sync {
    /// Send a prepared request and decode its response.
    async fn execute(&self, request: ApiRequest) -> Result<Value>;

    /// Run any operation by value, with its parameter if it takes one.
    async fn call(&self, operation: Operation, parameter: Option<&str>) -> Result<Value> {
        let request = ApiRequest::for_operation(operation, parameter)?;
        self.execute(request).await
    }

    /// Retrieve the server configuration.
    async fn get_config(&self) -> Result<Value> {
        self.execute(ApiRequest::new(Operation::GetConfig)?).await
    }

    /// Retrieve the power state and resource usage.
    async fn get_status(&self) -> Result<Value> {
        self.execute(ApiRequest::new(Operation::GetStatus)?).await
    }

    /// Power the server on.
    async fn start_server(&self) -> Result<Value> {
        self.execute(ApiRequest::new(Operation::Start)?).await
    }

    /// Power the server off.
    async fn stop_server(&self) -> Result<Value> {
        self.execute(ApiRequest::new(Operation::Stop)?).await
    }

    /// Restart the server.
    async fn restart_server(&self) -> Result<Value> {
        self.execute(ApiRequest::new(Operation::Restart)?).await
    }

    /// Start a backup with the given description ('24fire+' only).
    async fn create_backup(&self, description: &str) -> Result<Value> {
        self.execute(ApiRequest::create_backup(description)).await
    }

    /// Delete a backup ('24fire+' only).
    async fn delete_backup(&self, backup_id: &str) -> Result<Value> {
        self.execute(ApiRequest::delete_backup(backup_id)?).await
    }

    /// List backups ('24fire+' only).
    async fn list_backups(&self) -> Result<Value> {
        self.execute(ApiRequest::new(Operation::ListBackups)?).await
    }

    /// Retrieve monitoring timings ('24fire+' only).
    async fn monitoring_timings(&self) -> Result<Value> {
        self.execute(ApiRequest::new(Operation::GetMonitoringTimings)?)
            .await
    }

    /// Retrieve monitoring incidents ('24fire+' only).
    async fn monitoring_incidences(&self) -> Result<Value> {
        self.execute(ApiRequest::new(Operation::GetMonitoringIncidents)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fireapi_core::client::API_KEY_HEADER;
    use fireapi_core::Error;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> KvmClient {
        KvmClientBuilder::new("abc123")
            .unwrap()
            .with_base_url(server.uri())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn get_status_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .and(header(API_KEY_HEADER, "abc123"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "running"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let status = client.get_status().await.unwrap();
        assert_eq!(status, json!({"status": "running"}));
    }

    #[tokio::test]
    async fn restart_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/status/restart"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": "forbidden"})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.restart_server().await.unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.remote_message(), Some("forbidden"));
        assert!(err.is_authentication());
    }

    #[tokio::test]
    async fn unauthorized_without_body_gets_hint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/config"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.get_config().await.unwrap_err();
        assert_eq!(
            err.remote_message(),
            Some(fireapi_core::error::UNAUTHORIZED_HINT)
        );
    }

    #[tokio::test]
    async fn create_backup_sends_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/backup/create"))
            .and(body_json(json!({"description": "before upgrade"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "message": "VM backup task started",
                "data": {"backup_id": "4bd60b8f-d875-4fb9-88bc-6d930d9ff011"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let response = client.create_backup("before upgrade").await.unwrap();
        assert_eq!(
            response["data"]["backup_id"],
            "4bd60b8f-d875-4fb9-88bc-6d930d9ff011"
        );
    }

    #[tokio::test]
    async fn delete_backup_uses_query_parameter() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/backup/delete"))
            .and(query_param("backup_id", "f31ee183-7037-4e60-a37d-0f7406fd32d7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "message": "VM backup deleted",
                "data": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let response = client
            .delete_backup("f31ee183-7037-4e60-a37d-0f7406fd32d7")
            .await
            .unwrap();
        assert_eq!(response["message"], "VM backup deleted");
    }

    #[tokio::test]
    async fn delete_backup_blank_id_is_rejected_locally() {
        let server = MockServer::start().await;
        let client = test_client(&server);

        let err = client.delete_backup(" ").await.unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/backup/list"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.list_backups().await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn base_url_path_prefix_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/kvm/monitoring/incidences"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = KvmClientBuilder::new("abc123")
            .unwrap()
            .with_base_url(format!("{}/kvm", server.uri()))
            .build()
            .unwrap();
        assert!(client.base_url().as_str().ends_with("/kvm/"));
        client.monitoring_incidences().await.unwrap();
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/monitoring/timings"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = KvmClientBuilder::new("abc123")
            .unwrap()
            .with_base_url(server.uri())
            .with_timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let err = client.monitoring_timings().await.unwrap_err();
        assert!(matches!(err, Error::Timeout(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = KvmClientBuilder::new("abc123")
            .unwrap()
            .with_base_url(format!("http://127.0.0.1:{port}"))
            .build()
            .unwrap();
        let err = client.start_server().await.unwrap_err();
        assert!(matches!(err, Error::Unreachable(_)), "got {err:?}");
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn call_through_trait_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/status/stop"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let api: Box<dyn KvmApi> = Box::new(test_client(&server));
        let response = api.call(Operation::Stop, None).await.unwrap();
        assert_eq!(response, json!({"data": []}));
    }

    #[tokio::test]
    async fn configured_timeout_survives_http_config() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let config = FireConfig::new("abc123")
            .unwrap()
            .with_base_url(server.uri())
            .with_timeout(1);
        let client = KvmClientBuilder::from_config(config)
            .with_http_config(ClientConfig::new().with_logging(false))
            .build()
            .unwrap();
        let err = client.get_status().await.unwrap_err();
        assert!(matches!(err, Error::Timeout(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn http_config_without_agent_keeps_crate_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/config"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = KvmClientBuilder::new("abc123")
            .unwrap()
            .with_base_url(server.uri())
            .with_http_config(ClientConfig::new().with_compression(false))
            .build()
            .unwrap();
        client.get_config().await.unwrap();
    }

    #[test]
    fn builder_rejects_invalid_base_url() {
        let err = KvmClientBuilder::new("abc123")
            .unwrap()
            .with_base_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn debug_output_hides_key() {
        let client = KvmClient::new("very-secret-key").unwrap();
        assert!(!format!("{client:?}").contains("very-secret-key"));
        assert_eq!(client.base_url().as_str(), "https://api.24fire.de/kvm/");
    }
}
