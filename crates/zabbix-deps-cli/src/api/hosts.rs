//! Host, host group and API version lookups.

use std::collections::HashSet;

use serde_json::json;

use zabbix_deps::{monitored, Host, HostGroup, HostTemplates, Template};

use crate::client::ZabbixClient;
use crate::types::{ZabbixError, ZabbixResult};

impl ZabbixClient {
    /// Remote API version. Sent without authentication.
    pub async fn api_version(&self) -> ZabbixResult<String> {
        self.call("apiinfo.version", json!({})).await
    }

    pub async fn host_info(&self, hostid: &str) -> ZabbixResult<Option<Host>> {
        let hosts: Vec<Host> = self
            .call(
                "host.get",
                json!({
                    "hostids": hostid,
                    "output": ["hostid", "host", "name"]
                }),
            )
            .await?;
        Ok(hosts.into_iter().next())
    }

    /// Monitored hosts of the named group. An unknown group yields no hosts.
    pub async fn hosts_in_group(&self, group: &str) -> ZabbixResult<Vec<Host>> {
        let groups: Vec<HostGroup> = self
            .call(
                "hostgroup.get",
                json!({
                    "filter": { "name": [group] },
                    "output": ["name"],
                    "monitored_hosts": true,
                    "selectHosts": ["hostid", "name", "status"]
                }),
            )
            .await?;

        match groups.into_iter().next() {
            Some(g) => Ok(monitored(g.hosts)),
            None => {
                tracing::warn!("Host group {group:?} not found");
                Ok(Vec::new())
            }
        }
    }

    /// Monitored hosts of several groups in group order. A host that sits in
    /// more than one group is listed once.
    pub async fn hosts_in_groups(&self, groups: &[String]) -> ZabbixResult<Vec<Host>> {
        let mut seen = HashSet::new();
        let mut hosts = Vec::new();
        for group in groups {
            let found = self.hosts_in_group(group).await?;
            tracing::debug!("Group {group}: {} monitored hosts", found.len());
            hosts.extend(found.into_iter().filter(|h| seen.insert(h.hostid.clone())));
        }
        Ok(hosts)
    }

    pub async fn host_templates(&self, hostid: &str) -> ZabbixResult<Vec<Template>> {
        let hosts: Vec<HostTemplates> = self
            .call(
                "host.get",
                json!({
                    "hostids": hostid,
                    "selectParentTemplates": ["templateid", "host", "name"]
                }),
            )
            .await?;
        Ok(hosts
            .into_iter()
            .next()
            .map(|h| h.parent_templates)
            .unwrap_or_default())
    }

    /// First template linked to the host.
    pub async fn primary_template(&self, hostid: &str) -> ZabbixResult<Template> {
        let templates = self.host_templates(hostid).await?;
        tracing::info!("Host has {} template(s)", templates.len());
        let primary = templates
            .into_iter()
            .next()
            .ok_or_else(|| ZabbixError::NoTemplate(hostid.to_string()))?;
        tracing::info!("Using template: {} ({})", primary.name, primary.templateid);
        Ok(primary)
    }
}
