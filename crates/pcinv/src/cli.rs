//! Command-line arguments

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use pcinv_api::Resource;
use pcinv_core::{Mode, PartialConfig, RunOptions};

/// Produce an Ansible inventory from Prism Central
#[derive(Parser, Debug)]
#[command(name = "pcinv", version, about)]
#[command(group(
    ArgGroup::new("command")
        .args(["list", "host", "all", "vms", "clusters", "projects", "categories", "nodes"])
))]
pub struct Args {
    /// List all active VMs as Ansible inventory (default)
    #[arg(long)]
    pub list: bool,

    /// Get all Ansible inventory variables about a specific VM
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// List all Prism Central information as JSON
    #[arg(long)]
    pub all: bool,

    /// List VMs as JSON
    #[arg(short = 'v', long)]
    pub vms: bool,

    /// List clusters as JSON
    #[arg(long)]
    pub clusters: bool,

    /// List projects as JSON
    #[arg(long)]
    pub projects: bool,

    /// List categories as JSON
    #[arg(long)]
    pub categories: bool,

    /// List nodes as JSON
    #[arg(long)]
    pub nodes: bool,

    /// Pretty-print results
    #[arg(long)]
    pub pretty: bool,

    /// Directory holding the cache file (default: .)
    #[arg(long, value_name = "DIR")]
    pub cache_path: Option<PathBuf>,

    /// Maximum age of the cache in seconds (default: 0)
    #[arg(long, alias = "cache-max_age", value_name = "SECONDS")]
    pub cache_max_age: Option<u64>,

    /// Only use data from the cache
    #[arg(long)]
    pub force_cache: bool,

    /// Refresh every resource from Prism Central
    #[arg(short = 'r', long)]
    pub refresh_cache: bool,

    /// Display PC_IP_ADDR, PC_USERNAME and PC_PASSWORD
    #[arg(short = 'e', long)]
    pub env: bool,

    /// Prism Central IP address
    #[arg(short = 'i', long, value_name = "PC_IP_ADDR")]
    pub ip_addr: Option<String>,

    /// Prism Central username
    #[arg(short = 'u', long, value_name = "PC_USERNAME")]
    pub username: Option<String>,

    /// Prism Central password
    #[arg(short = 'p', long, value_name = "PC_PASSWORD")]
    pub password: Option<String>,

    /// Configuration file (default: prism_central.ini)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Selected output; `--list` when nothing else is given
    #[must_use]
    pub fn mode(&self) -> Mode {
        let resource = [
            (self.vms, Resource::Vms),
            (self.clusters, Resource::Clusters),
            (self.projects, Resource::Projects),
            (self.categories, Resource::Categories),
            (self.nodes, Resource::Nodes),
        ]
        .into_iter()
        .find_map(|(selected, resource)| selected.then_some(resource));

        if let Some(resource) = resource {
            Mode::Resource(resource)
        } else if self.all {
            Mode::All
        } else if let Some(host) = &self.host {
            Mode::Host(host.clone())
        } else {
            Mode::List
        }
    }

    /// Highest-precedence configuration layer
    #[must_use]
    pub fn layer(&self) -> PartialConfig {
        PartialConfig {
            ip_addr: self.ip_addr.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            cache_path: self.cache_path.clone(),
            cache_max_age: self.cache_max_age,
            group_variables: None,
        }
    }

    #[must_use]
    pub fn options(&self) -> RunOptions {
        RunOptions {
            mode: self.mode(),
            force_cache: self.force_cache,
            refresh_cache: self.refresh_cache,
            pretty: self.pretty,
        }
    }
}
