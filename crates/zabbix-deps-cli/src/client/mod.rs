//! HTTP transport for the Zabbix JSON-RPC API.

pub mod http;

pub use http::ZabbixClient;
