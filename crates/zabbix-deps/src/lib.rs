//! zabbix-deps: core logic for wiring Zabbix trigger dependencies by site.

pub mod discovery;
pub mod expression;
pub mod pairing;
pub mod site;
pub mod summary;
pub mod types;

pub use discovery::{base_item_key, looks_discovered, match_prototype_by_item_key, partition_discovered};
pub use expression::substitute_item_ids;
pub use pairing::{dependency_pairs, has_dependency, with_dependency, DependencyPair};
pub use site::{group_by_site, hosts_for_site, monitored, site_key};
pub use summary::{LinkOutcome, RunSummary, SiteSummary, Verdict};
pub use types::*;
