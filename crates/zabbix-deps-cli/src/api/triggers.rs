//! Trigger lookups and dependency updates.

use serde_json::json;

use zabbix_deps::{
    has_dependency, partition_discovered, with_dependency, DownTrigger, LinkOutcome, Trigger,
    DOWN_TRIGGER_DESCRIPTION,
};

use crate::client::ZabbixClient;
use crate::types::{ZabbixError, ZabbixResult};

/// Object family a dependency is written to. Both share the same API shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    Trigger,
    Prototype,
}

impl TriggerKind {
    fn get_method(&self) -> &'static str {
        match self {
            TriggerKind::Trigger => "trigger.get",
            TriggerKind::Prototype => "triggerprototype.get",
        }
    }

    fn update_method(&self) -> &'static str {
        match self {
            TriggerKind::Trigger => "trigger.update",
            TriggerKind::Prototype => "triggerprototype.update",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TriggerKind::Trigger => "Trigger",
            TriggerKind::Prototype => "Trigger prototype",
        }
    }
}

impl ZabbixClient {
    pub async fn trigger_info(&self, triggerid: &str) -> ZabbixResult<Option<Trigger>> {
        let triggers: Vec<Trigger> = self
            .call(
                "trigger.get",
                json!({
                    "triggerids": triggerid,
                    "output": ["triggerid", "description", "priority", "status"]
                }),
            )
            .await?;
        Ok(triggers.into_iter().next())
    }

    /// Enabled triggers of a host, sorted by description.
    ///
    /// Without `include_discovered`, triggers that are or look discovered are
    /// dropped.
    pub async fn host_triggers(
        &self,
        hostid: &str,
        include_discovered: bool,
    ) -> ZabbixResult<Vec<Trigger>> {
        let all: Vec<Trigger> = self
            .call(
                "trigger.get",
                json!({
                    "hostids": hostid,
                    "output": ["triggerid", "description", "priority", "status", "flags"],
                    "filter": { "status": 0 },
                    "sortfield": "description"
                }),
            )
            .await?;

        if include_discovered {
            tracing::info!("Found {} total triggers (including discovered)", all.len());
            return Ok(all);
        }

        let total = all.len();
        let (kept, skipped) = partition_discovered(all);
        tracing::info!(
            "Found {total} total triggers, {} discovered (skipped), {} normal",
            skipped.len(),
            kept.len()
        );
        Ok(kept)
    }

    /// `{HOST.HOST} Down` triggers of a host.
    ///
    /// Callers pass the visible name from the host group listing; Zabbix's
    /// `host` filter matches it for hosts whose visible and technical names
    /// agree, which is how the branch naming scheme is set up.
    pub async fn down_triggers(&self, host_name: &str) -> ZabbixResult<Vec<DownTrigger>> {
        let triggers: Vec<Trigger> = self
            .call(
                "trigger.get",
                json!({
                    "filter": { "host": [host_name] },
                    "search": { "description": DOWN_TRIGGER_DESCRIPTION },
                    "output": ["triggerid", "description"]
                }),
            )
            .await?;
        Ok(triggers
            .into_iter()
            .map(|t| DownTrigger {
                triggerid: t.triggerid,
                host_name: host_name.to_string(),
            })
            .collect())
    }

    /// Down triggers of several hosts, in host order.
    pub async fn down_triggers_for_hosts<'a, I>(&self, host_names: I) -> ZabbixResult<Vec<DownTrigger>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut all = Vec::new();
        for name in host_names {
            all.extend(self.down_triggers(name).await?);
        }
        Ok(all)
    }

    /// Make the trigger depend on `parent`, keeping its existing dependencies.
    pub async fn add_trigger_dependency(
        &self,
        triggerid: &str,
        parent: &str,
    ) -> ZabbixResult<LinkOutcome> {
        self.add_dependency(TriggerKind::Trigger, triggerid, parent)
            .await
    }

    /// Shared read-modify-write of a dependency list.
    pub(crate) async fn add_dependency(
        &self,
        kind: TriggerKind,
        id: &str,
        parent: &str,
    ) -> ZabbixResult<LinkOutcome> {
        let current: Vec<Trigger> = self
            .call(
                kind.get_method(),
                json!({
                    "triggerids": id,
                    "output": ["triggerid", "dependencies"],
                    "selectDependencies": ["triggerid"]
                }),
            )
            .await?;

        let current = current
            .into_iter()
            .next()
            .ok_or_else(|| ZabbixError::not_found(kind.label(), id))?;

        if has_dependency(&current.dependencies, parent) {
            tracing::info!("Dependency already exists for {} {id}", kind.label().to_lowercase());
            return Ok(LinkOutcome::AlreadyPresent);
        }

        let dependencies = with_dependency(&current.dependencies, parent);

        if self.dry_run() {
            tracing::info!(
                "Dry run: not writing dependency {id} -> {parent} ({} total)",
                dependencies.len()
            );
            return Ok(LinkOutcome::DryRun);
        }

        let _: serde_json::Value = self
            .call(
                kind.update_method(),
                json!({
                    "triggerid": id,
                    "dependencies": dependencies
                }),
            )
            .await?;
        Ok(LinkOutcome::Added)
    }
}
