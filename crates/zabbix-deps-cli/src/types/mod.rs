//! JSON-RPC envelope and error types used by the Zabbix client.

pub mod error;
pub mod message;

pub use error::*;
pub use message::*;
