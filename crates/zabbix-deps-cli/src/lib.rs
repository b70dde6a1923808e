//! zabbix-deps: wire Zabbix trigger dependencies over the JSON-RPC API.

pub mod api;
pub mod client;
pub mod commands;
pub mod config;
pub mod types;

pub use client::ZabbixClient;
pub use config::{ConfigOverrides, ZabbixConfig};
pub use types::{ZabbixError, ZabbixResult};
