//! Site derivation from host names.
//!
//! Hosts follow a `<SITE>-<ROLE>-<N>` naming scheme; the site is everything
//! before the first hyphen.

use std::collections::BTreeMap;

use crate::types::Host;

/// Site key for a host name. A name without a hyphen is its own site.
pub fn site_key(name: &str) -> &str {
    match name.split_once('-') {
        Some((site, _)) => site,
        None => name,
    }
}

/// Group hosts by site key. Sites are ordered by key; hosts keep input order.
pub fn group_by_site(hosts: &[Host]) -> BTreeMap<String, Vec<Host>> {
    let mut sites: BTreeMap<String, Vec<Host>> = BTreeMap::new();
    for host in hosts {
        sites
            .entry(site_key(&host.name).to_string())
            .or_default()
            .push(host.clone());
    }
    sites
}

/// Upstream hosts belonging to `site`, matched on the `"<site>-"` prefix.
pub fn hosts_for_site<'a>(hosts: &'a [Host], site: &str) -> Vec<&'a Host> {
    let prefix = format!("{site}-");
    hosts.iter().filter(|h| h.name.starts_with(&prefix)).collect()
}

/// Keep only monitored hosts.
pub fn monitored(hosts: Vec<Host>) -> Vec<Host> {
    hosts.into_iter().filter(Host::is_monitored).collect()
}
