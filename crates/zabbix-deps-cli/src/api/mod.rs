//! Typed Zabbix API operations, implemented as methods on [`ZabbixClient`].
//!
//! [`ZabbixClient`]: crate::client::ZabbixClient

pub mod hosts;
pub mod prototypes;
pub mod templates;
pub mod triggers;
