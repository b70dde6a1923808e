//! Discovered trigger to prototype resolution and prototype dependencies.
//!
//! Resolution is a best-effort guess: first the `templateid` link, then a
//! match on item key prefixes across the host's templates. A miss is not an
//! error, it just means the caller has to handle the trigger by hand.

use serde_json::json;

use zabbix_deps::{match_prototype_by_item_key, LinkOutcome, Trigger};

use crate::api::triggers::TriggerKind;
use crate::client::ZabbixClient;
use crate::types::{ZabbixError, ZabbixResult};

impl ZabbixClient {
    /// Guess the prototype that generated a discovered trigger.
    pub async fn resolve_prototype(&self, discovered_id: &str) -> ZabbixResult<Option<String>> {
        let triggers: Vec<Trigger> = self
            .call(
                "trigger.get",
                json!({
                    "triggerids": discovered_id,
                    "output": ["triggerid", "templateid", "description", "expression"],
                    "selectItems": ["itemid", "hostid", "key_"],
                    "selectHosts": ["hostid", "host"]
                }),
            )
            .await?;

        let Some(discovered) = triggers.into_iter().next() else {
            tracing::error!("Discovered trigger {discovered_id} not found");
            return Ok(None);
        };

        if let Some(template_trigger) = discovered.parent_template_trigger() {
            tracing::debug!("Found templateid: {template_trigger}");
            let parents: Vec<Trigger> = self
                .call(
                    "trigger.get",
                    json!({
                        "triggerids": template_trigger,
                        "output": ["triggerid", "flags"]
                    }),
                )
                .await?;
            if let Some(parent) = parents.first() {
                tracing::debug!("Template trigger flags: {}", parent.flags);
                if parent.is_prototype() {
                    return Ok(Some(template_trigger.to_string()));
                }
            }
        }

        if discovered.items.is_empty() {
            tracing::error!("No items found for trigger {discovered_id}");
            return Ok(None);
        }

        let Some(host) = discovered.hosts.first() else {
            tracing::error!("No host found for trigger {discovered_id}");
            return Ok(None);
        };

        let templates = self.host_templates(&host.hostid).await?;
        if templates.is_empty() {
            tracing::error!("No templates found for host {}", host.hostid);
            return Ok(None);
        }
        tracing::debug!("Found {} templates", templates.len());

        for template in &templates {
            tracing::debug!(
                "Searching prototypes in template: {} ({})",
                template.host,
                template.templateid
            );
            let prototypes: Vec<Trigger> = self
                .call(
                    "triggerprototype.get",
                    json!({
                        "templateids": template.templateid,
                        "output": ["triggerid", "description", "expression"],
                        "selectItems": ["itemid", "key_"]
                    }),
                )
                .await?;
            if prototypes.is_empty() {
                continue;
            }

            if let Some(found) = match_prototype_by_item_key(&discovered, &prototypes) {
                tracing::info!("Found matching prototype by item key: {}", found.triggerid);
                return Ok(Some(found.triggerid.clone()));
            }
        }

        Ok(None)
    }

    /// Make a trigger prototype depend on `parent`.
    ///
    /// When `parent` lives on a monitored host, a template copy of it on
    /// `hostid`'s primary template is used instead. The copy is looked up
    /// before being created and remembered for the rest of the run.
    pub async fn add_prototype_dependency(
        &self,
        prototype_id: &str,
        parent: &str,
        hostid: &str,
    ) -> ZabbixResult<LinkOutcome> {
        let parents: Vec<Trigger> = self
            .call(
                "trigger.get",
                json!({
                    "triggerids": parent,
                    "output": ["triggerid", "flags", "templateid"],
                    "selectHosts": ["hostid", "status"]
                }),
            )
            .await?;
        let parent_trigger = parents
            .into_iter()
            .next()
            .ok_or_else(|| ZabbixError::not_found("Parent trigger", parent))?;

        let mut effective_parent = parent.to_string();
        if parent_trigger.on_monitored_host() {
            tracing::info!("Parent trigger is on a host, a template version is needed");
            let template = self.primary_template(hostid).await?;

            if self.dry_run() {
                tracing::info!(
                    "Dry run: would create a template copy of trigger {parent} on {} and link prototype {prototype_id}",
                    template.name
                );
                return Ok(LinkOutcome::DryRun);
            }

            effective_parent = match self.cached_template_copy(parent, &template.templateid).await {
                Some(copy) => copy,
                None => {
                    let copy = self
                        .create_template_trigger(parent, &template.templateid)
                        .await?;
                    self.remember_template_copy(parent, &template.templateid, &copy)
                        .await;
                    copy
                }
            };
            tracing::info!("Using template trigger {effective_parent} for dependencies");
        }

        self.add_dependency(TriggerKind::Prototype, prototype_id, &effective_parent)
            .await
    }
}
