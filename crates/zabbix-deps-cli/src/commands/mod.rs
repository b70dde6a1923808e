//! Command implementations behind the `zabbix-deps` subcommands.

pub mod link;
pub mod sites;

pub use link::LinkParams;
pub use sites::SitesParams;
