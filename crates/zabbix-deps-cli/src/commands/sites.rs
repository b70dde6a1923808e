//! Command: sites: per-site bulk linking of dependent Down triggers to
//! upstream Down triggers.

use zabbix_deps::{dependency_pairs, group_by_site, hosts_for_site, Host, SiteSummary};

use crate::client::ZabbixClient;
use crate::types::{ZabbixError, ZabbixResult};

#[derive(Debug, Clone)]
pub struct SitesParams {
    /// Groups holding the dependent devices (switches).
    pub dependent_groups: Vec<String>,
    /// Groups holding the upstream devices (firewalls).
    pub upstream_groups: Vec<String>,
}

impl SitesParams {
    pub fn new(dependent_groups: Vec<String>, upstream_groups: Vec<String>) -> ZabbixResult<Self> {
        if dependent_groups.is_empty() || upstream_groups.is_empty() {
            return Err(ZabbixError::Config(
                "at least one dependent and one upstream group are required".to_string(),
            ));
        }
        Ok(Self {
            dependent_groups,
            upstream_groups,
        })
    }
}

pub async fn execute(client: &ZabbixClient, params: &SitesParams) -> ZabbixResult<SiteSummary> {
    let dependent_hosts = client.hosts_in_groups(&params.dependent_groups).await?;
    let dependent_sites = group_by_site(&dependent_hosts);

    let upstream_hosts = client.hosts_in_groups(&params.upstream_groups).await?;
    let upstream_sites = group_by_site(&upstream_hosts);

    tracing::info!(
        "Found {} dependent sites and {} upstream sites",
        dependent_sites.len(),
        upstream_sites.len()
    );

    let mut summary = SiteSummary {
        dependent_sites: dependent_sites.len(),
        upstream_sites: upstream_sites.len(),
        ..Default::default()
    };

    for (site, dependents) in &dependent_sites {
        let upstream = hosts_for_site(&upstream_hosts, site);
        if upstream.is_empty() {
            tracing::warn!("No upstream hosts found for site {site}, skipping");
            summary.sites_skipped += 1;
            continue;
        }

        let upstream_triggers = client
            .down_triggers_for_hosts(upstream.iter().map(|h| h.name.as_str()))
            .await?;
        if upstream_triggers.is_empty() {
            tracing::warn!("No upstream 'Down' triggers found for site {site}, skipping");
            summary.sites_skipped += 1;
            continue;
        }

        tracing::info!(
            "Site {site}: {} dependent hosts, {} upstream hosts, {} upstream Down triggers",
            dependents.len(),
            upstream.len(),
            upstream_triggers.len()
        );
        summary.sites_linked += 1;

        for host in dependents {
            link_host(client, host, &upstream_triggers, &mut summary).await?;
        }
    }

    tracing::info!("Bulk site dependency creation complete");
    Ok(summary)
}

async fn link_host(
    client: &ZabbixClient,
    host: &Host,
    upstream: &[zabbix_deps::DownTrigger],
    summary: &mut SiteSummary,
) -> ZabbixResult<()> {
    let own: Vec<String> = client
        .down_triggers(&host.name)
        .await?
        .into_iter()
        .map(|t| t.triggerid)
        .collect();

    if own.is_empty() {
        tracing::debug!("Host {} has no Down trigger", host.name);
    }

    for pair in dependency_pairs(&own, upstream) {
        let fw = pair.upstream;
        match client.add_trigger_dependency(pair.dependent, &fw.triggerid).await {
            Ok(outcome) => {
                summary.record(outcome);
                tracing::info!(
                    "Dependency {}: {} Down trigger {} -> upstream {} trigger {}",
                    outcome.label(),
                    host.name,
                    pair.dependent,
                    fw.host_name,
                    fw.triggerid
                );
            }
            Err(e) => {
                summary.errors += 1;
                tracing::error!(
                    "Failed to add dependency: {} Down trigger {} -> upstream {} trigger {}: {e}",
                    host.name,
                    pair.dependent,
                    fw.host_name,
                    fw.triggerid
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_require_groups() {
        assert!(SitesParams::new(vec![], vec!["fw".into()]).is_err());
        assert!(SitesParams::new(vec!["sw".into()], vec![]).is_err());
        let p = SitesParams::new(vec!["branch-junos".into(), "branch-mist".into()], vec!["branch-paloalto".into()])
            .unwrap();
        assert_eq!(p.dependent_groups.len(), 2);
    }
}
