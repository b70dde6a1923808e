//! Command: link: make every trigger of one host depend on a parent trigger.

use zabbix_deps::{validate_id, LinkOutcome, RunSummary, Trigger};

use crate::client::ZabbixClient;
use crate::types::{ZabbixError, ZabbixResult};

#[derive(Debug, Clone)]
pub struct LinkParams {
    pub hostid: String,
    pub parent_triggerid: String,
    pub include_discovered: bool,
}

impl LinkParams {
    pub fn new(hostid: &str, parent_triggerid: &str, include_discovered: bool) -> ZabbixResult<Self> {
        Ok(Self {
            hostid: validate_id("hostid", hostid)?,
            parent_triggerid: validate_id("parent_triggerid", parent_triggerid)?,
            include_discovered,
        })
    }
}

/// Run the link command. `None` means the host had no enabled triggers.
pub async fn execute(client: &ZabbixClient, params: &LinkParams) -> ZabbixResult<Option<RunSummary>> {
    tracing::info!("Connecting to Zabbix API at {}", client.url());
    let version = client.api_version().await?;
    tracing::info!("Connected to Zabbix API version: {version}");

    tracing::info!("Validating host ID: {}", params.hostid);
    let host = client
        .host_info(&params.hostid)
        .await?
        .ok_or_else(|| ZabbixError::not_found("Host", &params.hostid))?;
    tracing::info!("Host found: {} ({})", host.name, host.host);

    tracing::info!("Validating parent trigger ID: {}", params.parent_triggerid);
    let parent = client
        .trigger_info(&params.parent_triggerid)
        .await?
        .ok_or_else(|| ZabbixError::not_found("Parent trigger", &params.parent_triggerid))?;
    tracing::info!("Parent trigger found: {}", parent.description);

    if params.include_discovered {
        tracing::info!("Fetching ALL triggers for host {} (including discovered)", params.hostid);
    } else {
        tracing::info!("Fetching normal triggers for host {} (excluding discovered)", params.hostid);
    }
    let triggers = client
        .host_triggers(&params.hostid, params.include_discovered)
        .await?;

    if triggers.is_empty() {
        tracing::warn!("No enabled triggers found for host {}", params.hostid);
        return Ok(None);
    }
    tracing::info!("Found {} enabled trigger(s)", triggers.len());

    let mut summary = RunSummary::new(triggers.len());
    for trigger in &triggers {
        link_one(client, params, trigger, &mut summary).await;
    }
    Ok(Some(summary))
}

async fn link_one(
    client: &ZabbixClient,
    params: &LinkParams,
    trigger: &Trigger,
    summary: &mut RunSummary,
) {
    let desc = &trigger.description;

    if trigger.triggerid == params.parent_triggerid {
        tracing::info!("Skipping parent trigger: {desc}");
        summary.skipped += 1;
        return;
    }

    if trigger.is_discovered() {
        tracing::info!("Found discovered trigger: {desc}");
        match link_discovered(client, params, trigger).await {
            Ok(Some(outcome)) => {
                summary.record_prototype(outcome);
                tracing::info!("Updated prototype for discovered trigger ({}): {desc}", outcome.label());
            }
            Ok(None) => {
                summary.prototype_errors += 1;
                tracing::warn!("Could not find prototype for discovered trigger: {desc}");
                tracing::warn!("  Trigger ID: {}", trigger.triggerid);
                tracing::warn!("  Update the LLD rule, the trigger prototype, or the template that generates it by hand");
            }
            Err(e) => {
                summary.prototype_errors += 1;
                tracing::error!("Failed to update prototype for discovered trigger {desc}: {e}");
            }
        }
        return;
    }

    tracing::info!("Adding dependency to normal trigger: {desc}");
    match client
        .add_trigger_dependency(&trigger.triggerid, &params.parent_triggerid)
        .await
    {
        Ok(outcome) => {
            summary.record_trigger(outcome);
            tracing::info!("Dependency {} for trigger: {desc}", outcome.label());
        }
        Err(e) => {
            summary.errors += 1;
            tracing::error!("Failed to add dependency for trigger {desc}: {e}");
        }
    }
}

async fn link_discovered(
    client: &ZabbixClient,
    params: &LinkParams,
    trigger: &Trigger,
) -> ZabbixResult<Option<LinkOutcome>> {
    let Some(prototype) = client.resolve_prototype(&trigger.triggerid).await? else {
        return Ok(None);
    };
    tracing::info!("Found prototype ID: {prototype}");
    client
        .add_prototype_dependency(&prototype, &params.parent_triggerid, &params.hostid)
        .await
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_validate_ids() {
        let p = LinkParams::new(" 10084", "23296 ", true).unwrap();
        assert_eq!(p.hostid, "10084");
        assert_eq!(p.parent_triggerid, "23296");
        assert!(LinkParams::new("host-1", "1", false).is_err());
        assert!(matches!(
            LinkParams::new("1", "abc", false),
            Err(ZabbixError::Domain(_))
        ));
    }
}
