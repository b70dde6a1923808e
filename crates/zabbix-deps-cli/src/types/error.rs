//! Error type for everything that can go wrong talking to Zabbix.

use super::message::JsonRpcErrorObject;

/// All errors raised by the client, the typed API calls and configuration.
#[derive(thiserror::Error, Debug)]
pub enum ZabbixError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error in {method}: {message} {data}")]
    Api {
        method: String,
        code: i32,
        message: String,
        data: String,
    },

    #[error("Response to {0} carried no result")]
    MissingResult(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("No templates found for host {0}")]
    NoTemplate(String),

    #[error("Trigger {0} has no items")]
    NoItems(String),

    #[error("trigger.create returned no trigger ID for {0}")]
    CreateFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Domain(#[from] zabbix_deps::DepsError),
}

impl ZabbixError {
    pub fn api(method: &str, error: JsonRpcErrorObject) -> Self {
        let data = error.data_text();
        ZabbixError::Api {
            method: method.to_string(),
            code: error.code,
            message: if error.message.is_empty() {
                "Unknown error".to_string()
            } else {
                error.message
            },
            data,
        }
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        ZabbixError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Whether the request never produced a usable HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ZabbixError::Http(_) | ZabbixError::HttpStatus { .. })
    }
}

pub type ZabbixResult<T> = Result<T, ZabbixError>;
