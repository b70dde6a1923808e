//! zabbix-deps entry point.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use zabbix_deps_cli::commands::{link, sites, LinkParams, SitesParams};
use zabbix_deps_cli::{ConfigOverrides, ZabbixClient, ZabbixConfig};

#[derive(Parser)]
#[command(
    name = "zabbix-deps",
    about = "Wire Zabbix trigger dependencies so downstream Down alerts stay quiet while the upstream device is down",
    version
)]
struct Cli {
    /// Zabbix API endpoint (the full api_jsonrpc.php URL). Also reads ZABBIX_URL.
    #[arg(long, global = true)]
    url: Option<String>,

    /// API token. Also reads ZABBIX_API_TOKEN.
    #[arg(long, global = true)]
    token: Option<String>,

    /// Request timeout in seconds (default 30). Also reads ZABBIX_TIMEOUT.
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Skip TLS certificate verification.
    #[arg(long, global = true)]
    insecure: bool,

    /// Read everything, write nothing.
    #[arg(long, global = true)]
    dry_run: bool,

    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Make every enabled trigger of a host depend on a parent trigger.
    Link {
        /// ID of the host whose triggers will depend on the parent.
        hostid: String,

        /// ID of the trigger the others will depend on.
        parent_triggerid: String,

        /// Also handle discovered triggers by updating their prototypes.
        ///
        /// Discovered triggers can only depend on template-level triggers, so
        /// this may create a template copy of the parent trigger.
        #[arg(long)]
        include_discovered: bool,
    },

    /// Link each site's dependent Down triggers to its upstream Down triggers.
    ///
    /// Sites are the host name prefix before the first hyphen.
    Sites {
        /// Host group holding dependent devices (repeatable).
        #[arg(long = "dependent-group", required = true)]
        dependent_groups: Vec<String>,

        /// Host group holding upstream devices (repeatable).
        #[arg(long = "upstream-group", required = true)]
        upstream_groups: Vec<String>,
    },

    /// Print the remote API version.
    Version,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   zabbix-deps completions bash > ~/.local/share/bash-completion/completions/zabbix-deps
    ///   zabbix-deps completions zsh > ~/.zfunc/_zabbix-deps
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let code = tokio::select! {
        result = run(cli) => match result {
            Ok(code) => code,
            Err(e) => {
                tracing::error!("{e:#}");
                1
            }
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Operation cancelled by user");
            1
        }
    };

    std::process::exit(code);
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "zabbix-deps", &mut std::io::stdout());
        return Ok(0);
    }

    let overrides = ConfigOverrides {
        config_path: cli.config,
        url: cli.url,
        token: cli.token,
        timeout_secs: cli.timeout,
        insecure: cli.insecure,
    };

    match cli.command {
        Commands::Link {
            hostid,
            parent_triggerid,
            include_discovered,
        } => {
            let params = LinkParams::new(&hostid, &parent_triggerid, include_discovered)?;
            let client = connect(overrides, cli.dry_run)?;
            match link::execute(&client, &params).await? {
                Some(summary) => {
                    println!("\n{summary}");
                    Ok(summary.exit_code())
                }
                None => Ok(0),
            }
        }

        Commands::Sites {
            dependent_groups,
            upstream_groups,
        } => {
            let params = SitesParams::new(dependent_groups, upstream_groups)?;
            let client = connect(overrides, cli.dry_run)?;
            let summary = sites::execute(&client, &params).await?;
            println!("\n{summary}");
            Ok(summary.exit_code())
        }

        Commands::Version => {
            let client = connect(overrides, cli.dry_run)?;
            let version = client.api_version().await?;
            println!("{version}");
            Ok(0)
        }

        Commands::Completions { .. } => Ok(0),
    }
}

fn connect(overrides: ConfigOverrides, dry_run: bool) -> anyhow::Result<ZabbixClient> {
    let config = ZabbixConfig::load(overrides)?;
    tracing::debug!("Resolved configuration: {config:?}");
    if dry_run {
        tracing::info!("Dry run: no changes will be written");
    }
    Ok(ZabbixClient::new(&config)?.with_dry_run(dry_run))
}
