//! Zabbix entities as returned by the configuration API.
//!
//! Every entity is owned by the remote server; these types only mirror the
//! fields the dependency tooling asks for. Zabbix encodes most scalars as
//! strings but some deployments return bare numbers, so scalar fields accept
//! both.

use serde::{Deserialize, Deserializer, Serialize};

/// Host status value for a monitored host. Templates report `3`.
pub const HOST_MONITORED: &str = "0";

/// Description searched for when looking up a host's availability trigger.
pub const DOWN_TRIGGER_DESCRIPTION: &str = "{HOST.HOST} Down";

/// Trigger origin as encoded in the `flags` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerFlags {
    /// Plain trigger configured by hand or inherited from a template.
    #[default]
    Plain,
    /// Trigger prototype belonging to a discovery rule.
    Prototype,
    /// Trigger generated by low-level discovery.
    Discovered,
    /// Any value this tool does not interpret.
    Other(u32),
}

impl TriggerFlags {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => TriggerFlags::Plain,
            2 => TriggerFlags::Prototype,
            4 => TriggerFlags::Discovered,
            other => TriggerFlags::Other(other),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            TriggerFlags::Plain => 0,
            TriggerFlags::Prototype => 2,
            TriggerFlags::Discovered => 4,
            TriggerFlags::Other(code) => *code,
        }
    }
}

impl std::fmt::Display for TriggerFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for TriggerFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code().to_string())
    }
}

impl<'de> Deserialize<'de> for TriggerFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient_string(deserializer)?;
        let code = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| serde::de::Error::custom(format!("invalid trigger flags: {raw:?}")))?;
        Ok(TriggerFlags::from_code(code))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

/// Deserialize a scalar that may arrive as a JSON string or a JSON number.
pub fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => Ok(s),
        StringOrNumber::Number(n) => Ok(n.to_string()),
    }
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<StringOrNumber>::deserialize(deserializer).map(|v| {
        v.map(|v| match v {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        })
    })
}

/// A monitored host (or template, when returned through `parentTemplates`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Host {
    #[serde(deserialize_with = "lenient_string")]
    pub hostid: String,
    /// Technical host name.
    #[serde(default)]
    pub host: String,
    /// Visible name. Site derivation works on this one.
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
}

impl Host {
    pub fn is_monitored(&self) -> bool {
        self.status == HOST_MONITORED
    }
}

/// A host group with its member hosts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostGroup {
    #[serde(default, deserialize_with = "lenient_string")]
    pub groupid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hosts: Vec<Host>,
}

/// A template linked to a host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(deserialize_with = "lenient_string")]
    pub templateid: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub name: String,
}

/// Host entry as returned by `host.get` with `selectParentTemplates`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostTemplates {
    #[serde(default, deserialize_with = "lenient_string")]
    pub hostid: String,
    #[serde(default, rename = "parentTemplates")]
    pub parent_templates: Vec<Template>,
}

/// An item referenced by a trigger expression.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(deserialize_with = "lenient_string")]
    pub itemid: String,
    #[serde(default)]
    pub key_: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub hostid: Option<String>,
}

/// Host reference embedded in a trigger through `selectHosts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerHost {
    #[serde(deserialize_with = "lenient_string")]
    pub hostid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,
}

impl TriggerHost {
    pub fn is_monitored(&self) -> bool {
        self.status.as_deref() == Some(HOST_MONITORED)
    }
}

/// Element of a trigger's dependency list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerRef {
    #[serde(deserialize_with = "lenient_string")]
    pub triggerid: String,
}

impl TriggerRef {
    pub fn new(triggerid: impl Into<String>) -> Self {
        Self {
            triggerid: triggerid.into(),
        }
    }
}

/// A trigger or trigger prototype. Only the requested output fields are set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(deserialize_with = "lenient_string")]
    pub triggerid: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub flags: TriggerFlags,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub templateid: Option<String>,
    #[serde(default)]
    pub expression: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<TriggerRef>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub hosts: Vec<TriggerHost>,
}

impl Trigger {
    pub fn is_discovered(&self) -> bool {
        self.flags == TriggerFlags::Discovered
    }

    pub fn is_prototype(&self) -> bool {
        self.flags == TriggerFlags::Prototype
    }

    /// Template trigger this one was inherited from, if any.
    ///
    /// Zabbix reports `"0"` for triggers without a parent.
    pub fn parent_template_trigger(&self) -> Option<&str> {
        self.templateid
            .as_deref()
            .filter(|id| !id.is_empty() && *id != "0")
    }

    /// Whether any host the trigger lives on is a monitored host.
    pub fn on_monitored_host(&self) -> bool {
        self.hosts.iter().any(TriggerHost::is_monitored)
    }
}

/// A `{HOST.HOST} Down` trigger together with the host it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownTrigger {
    pub triggerid: String,
    pub host_name: String,
}

/// Errors raised by the pure domain layer.
#[derive(thiserror::Error, Debug)]
pub enum DepsError {
    #[error("Invalid {field}: '{value}' must be a number")]
    InvalidId { field: &'static str, value: String },
}

/// Convenience result type.
pub type DepsResult<T> = Result<T, DepsError>;

/// Check that an object ID is a non-empty run of ASCII digits.
pub fn validate_id(field: &'static str, value: &str) -> DepsResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DepsError::InvalidId {
            field,
            value: value.to_string(),
        });
    }
    Ok(trimmed.to_string())
}
