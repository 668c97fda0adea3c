//! The async and blocking clients must agree on every operation.

use fireapi_kvm::{
    BlockingKvmApi, BlockingKvmClient, KvmApi, KvmClient, KvmClientBuilder, Operation,
};
use serde_json::{json, Value};
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BACKUP_ID: &str = "4bd60b8f-d875-4fb9-88bc-6d930d9ff011";
const DESCRIPTION: &str = "parity-check-description";

fn parameter(operation: Operation) -> Option<&'static str> {
    match operation {
        Operation::CreateBackup => Some(DESCRIPTION),
        Operation::DeleteBackup => Some(BACKUP_ID),
        _ => None,
    }
}

fn clients(server: &MockServer) -> (KvmClient, BlockingKvmClient) {
    let builder = || {
        KvmClientBuilder::new("abc123")
            .unwrap()
            .with_base_url(server.uri())
    };
    (
        builder().build().unwrap(),
        builder().build_blocking().unwrap(),
    )
}

fn mount_all(rt: &Runtime, server: &MockServer, status: u16, body: impl Fn(Operation) -> Value) {
    for operation in Operation::all() {
        let mock = Mock::given(method(operation.method().as_str()))
            .and(path(format!("/{}", operation.path())))
            .respond_with(ResponseTemplate::new(status).set_body_json(body(*operation)));
        rt.block_on(mock.mount(server));
    }
}

#[test]
fn success_bodies_match() {
    let rt = Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    mount_all(&rt, &server, 200, |op| {
        json!({"status": "success", "message": op.name(), "data": {"op": op.name()}})
    });
    let (async_client, blocking_client) = clients(&server);

    for operation in Operation::all().iter().copied() {
        let expected = json!({
            "status": "success",
            "message": operation.name(),
            "data": {"op": operation.name()}
        });

        let from_async = rt
            .block_on(async_client.call(operation, parameter(operation)))
            .unwrap();
        let from_blocking = blocking_client
            .call(operation, parameter(operation))
            .unwrap();

        assert_eq!(from_async, expected, "{operation} (async)");
        assert_eq!(from_blocking, expected, "{operation} (blocking)");
    }
}

#[test]
fn error_statuses_match() {
    let rt = Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    mount_all(&rt, &server, 418, |op| json!({"error": format!("{op} refused")}));
    let (async_client, blocking_client) = clients(&server);

    for operation in Operation::all().iter().copied() {
        let from_async = rt
            .block_on(async_client.call(operation, parameter(operation)))
            .unwrap_err();
        let from_blocking = blocking_client
            .call(operation, parameter(operation))
            .unwrap_err();

        assert_eq!(from_async.status(), Some(418), "{operation}");
        assert_eq!(from_async, from_blocking, "{operation}");
        assert_eq!(
            from_async.remote_message(),
            Some(format!("{operation} refused").as_str())
        );
    }
}

#[test]
fn description_sent_exactly_once() {
    let rt = Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    mount_all(&rt, &server, 200, |_| json!({"status": "success"}));
    let (async_client, blocking_client) = clients(&server);

    rt.block_on(async_client.create_backup(DESCRIPTION)).unwrap();
    blocking_client.create_backup(DESCRIPTION).unwrap();

    let requests = rt.block_on(server.received_requests()).unwrap();
    assert_eq!(requests.len(), 2);
    for request in requests {
        let body = String::from_utf8(request.body.clone()).unwrap();
        assert_eq!(body.matches(DESCRIPTION).count(), 1, "body: {body}");
        assert_eq!(
            serde_json::from_str::<Value>(&body).unwrap(),
            json!({"description": DESCRIPTION})
        );
    }
}
