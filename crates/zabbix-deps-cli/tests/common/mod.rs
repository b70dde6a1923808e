//! Shared helpers: a mocked Zabbix endpoint backed by wiremock.

#![allow(dead_code)]

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockBuilder, MockServer, Request, ResponseTemplate};

use zabbix_deps_cli::{ZabbixClient, ZabbixConfig};

pub const API_PATH: &str = "/zabbix/api_jsonrpc.php";
pub const TOKEN: &str = "test-token";

pub fn config_for(server: &MockServer, timeout: Duration) -> ZabbixConfig {
    ZabbixConfig {
        url: format!("{}{API_PATH}", server.uri()),
        token: TOKEN.to_string(),
        timeout,
        verify_tls: true,
    }
}

pub fn client_for(server: &MockServer) -> ZabbixClient {
    ZabbixClient::new(&config_for(server, Duration::from_secs(5))).unwrap()
}

/// Match a JSON-RPC call of `rpc_method` whose params include `params`.
pub fn rpc(rpc_method: &str, params: Value) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(body_partial_json(json!({
            "jsonrpc": "2.0",
            "method": rpc_method,
            "params": params
        })))
}

/// Successful JSON-RPC response carrying `value`.
pub fn result(value: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "result": value,
        "id": 1
    }))
}

/// JSON-RPC error response.
pub fn rpc_error(code: i32, message: &str, data: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "error": { "code": code, "message": message, "data": data },
        "id": 1
    }))
}

/// Mount `rpc_method` + `params` → `value`.
pub async fn answer(server: &MockServer, rpc_method: &str, params: Value, value: Value) {
    rpc(rpc_method, params)
        .respond_with(result(value))
        .mount(server)
        .await;
}

/// Mount a call that must be received exactly `times` times.
pub async fn expect_call(
    server: &MockServer,
    rpc_method: &str,
    params: Value,
    value: Value,
    times: u64,
) {
    rpc(rpc_method, params)
        .respond_with(result(value))
        .expect(times)
        .mount(server)
        .await;
}

/// Decoded bodies of every request the server received, in order.
pub async fn received_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r: &Request| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

/// Methods called, in order.
pub async fn called_methods(server: &MockServer) -> Vec<String> {
    received_bodies(server)
        .await
        .iter()
        .map(|b| b["method"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// Count of calls to `rpc_method`.
pub async fn count_calls(server: &MockServer, rpc_method: &str) -> usize {
    called_methods(server)
        .await
        .iter()
        .filter(|m| m.as_str() == rpc_method)
        .count()
}
