//! Synthesis of template-level copies of host triggers.
//!
//! Trigger prototypes may only depend on template triggers, so a host-level
//! parent has to be mirrored onto the dependent host's template first.

use serde::Deserialize;
use serde_json::json;

use zabbix_deps::expression::{
    template_trigger_comments, template_trigger_description, DEFAULT_PRIORITY,
};
use zabbix_deps::{substitute_item_ids, Item, Trigger};

use crate::client::ZabbixClient;
use crate::types::{ZabbixError, ZabbixResult};

#[derive(Debug, Deserialize)]
struct CreateResult {
    #[serde(default)]
    triggerids: Vec<String>,
}

impl ZabbixClient {
    /// Template item carrying the same key as a host item.
    pub async fn template_item(&self, templateid: &str, key: &str) -> ZabbixResult<Option<Item>> {
        let items: Vec<Item> = self
            .call(
                "item.get",
                json!({
                    "templateids": templateid,
                    "filter": { "key_": key },
                    "output": ["itemid", "key_"]
                }),
            )
            .await?;
        Ok(items.into_iter().next())
    }

    /// Trigger on `templateid` carrying exactly this description.
    pub async fn find_template_trigger(
        &self,
        templateid: &str,
        description: &str,
    ) -> ZabbixResult<Option<String>> {
        let triggers: Vec<Trigger> = self
            .call(
                "trigger.get",
                json!({
                    "templateids": templateid,
                    "filter": { "description": description },
                    "output": ["triggerid", "description"]
                }),
            )
            .await?;
        Ok(triggers
            .into_iter()
            .find(|t| t.description == description)
            .map(|t| t.triggerid))
    }

    /// Template copy of a host trigger on `templateid`, creating it if needed.
    ///
    /// An existing `Template: <description>` trigger on the template is
    /// reused. Items with no template counterpart keep their host item ID in
    /// the expression; Zabbix then rejects or accepts the expression as it
    /// sees fit.
    pub async fn create_template_trigger(
        &self,
        host_triggerid: &str,
        templateid: &str,
    ) -> ZabbixResult<String> {
        let triggers: Vec<Trigger> = self
            .call(
                "trigger.get",
                json!({
                    "triggerids": host_triggerid,
                    "output": ["triggerid", "description", "expression", "priority", "comments"],
                    "selectItems": ["itemid", "key_", "hostid"],
                    "selectHosts": ["hostid", "host"]
                }),
            )
            .await?;
        let source = triggers
            .into_iter()
            .next()
            .ok_or_else(|| ZabbixError::not_found("Host trigger", host_triggerid))?;

        let description = template_trigger_description(&source.description);
        if let Some(existing) = self.find_template_trigger(templateid, &description).await? {
            tracing::info!("Reusing template trigger: {description} (ID: {existing})");
            return Ok(existing);
        }

        tracing::info!("Creating template trigger based on: {}", source.description);

        if source.items.is_empty() {
            return Err(ZabbixError::NoItems(host_triggerid.to_string()));
        }

        let mut replacements = Vec::with_capacity(source.items.len());
        for item in &source.items {
            match self.template_item(templateid, &item.key_).await? {
                Some(template_item) => {
                    tracing::debug!("Replaced item {} with {}", item.itemid, template_item.itemid);
                    replacements.push((item.itemid.clone(), template_item.itemid));
                }
                None => tracing::warn!("Could not find template item for key: {}", item.key_),
            }
        }

        let expression = substitute_item_ids(source.expression.as_deref().unwrap_or_default(), &replacements);

        let created: CreateResult = self
            .call(
                "trigger.create",
                json!({
                    "description": description,
                    "expression": expression,
                    "priority": source.priority.as_deref().unwrap_or(DEFAULT_PRIORITY),
                    "comments": template_trigger_comments(host_triggerid, source.comments.as_deref()),
                    "status": 0
                }),
            )
            .await?;

        let id = created
            .triggerids
            .into_iter()
            .next()
            .ok_or_else(|| ZabbixError::CreateFailed(description.clone()))?;
        tracing::info!("Created template trigger: {description} (ID: {id})");
        Ok(id)
    }
}
