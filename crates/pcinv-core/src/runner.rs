//! One invocation, from configuration to output document

use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use pcinv_api::Resource;
use pcinv_client::PrismApi;
use pcinv_inventory::InventoryBuilder;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::CoreError;
use crate::loader::{CachePolicy, ResourceLoader, RunContext, Selection};
use crate::lookup::lookup_host;

/// What the run prints
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Ansible inventory of all VMs
    #[default]
    List,
    /// Variables of one VM
    Host(String),
    /// Every collection as raw JSON
    All,
    /// One collection as raw JSON
    Resource(Resource),
}

/// Drives one run against an API and a cache file
pub struct Runner<A> {
    config: Config,
    api: A,
    cache: CacheStore,
}

impl<A: PrismApi> Runner<A> {
    pub fn new(config: Config, api: A) -> Self {
        let cache = CacheStore::new(&config.cache_path);
        Self { config, api, cache }
    }

    #[must_use]
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Produce the output document, writing the cache if anything was fetched
    ///
    /// # Errors
    /// Fails on `--force-cache` without a usable cache and on host lookup
    /// failures. API errors are not failures: they appear in the document.
    #[instrument(skip(self), fields(mode = ?self.config.options.mode))]
    pub async fn run(&self) -> Result<Value, CoreError> {
        let mut ctx = self.prepare()?;
        let loader = ResourceLoader::new(&self.api, &self.cache, self.policy());

        let document = match &self.config.options.mode {
            Mode::Resource(resource) => {
                loader.load(&mut ctx, Selection::One(*resource)).await;
                let mut doc = Map::new();
                doc.insert(
                    resource.name().to_string(),
                    collection_or_null(&ctx, *resource),
                );
                Value::Object(doc)
            }
            Mode::All => {
                loader.load(&mut ctx, Selection::All).await;
                let doc: Map<String, Value> = ctx
                    .data
                    .iter()
                    .map(|(resource, value)| (resource.name().to_string(), value.clone()))
                    .collect();
                Value::Object(doc)
            }
            Mode::Host(host) => lookup_host(&self.api, host).await?,
            Mode::List => {
                loader.load(&mut ctx, Selection::One(Resource::Vms)).await;
                let vms = collection_or_null(&ctx, Resource::Vms);
                let inventory =
                    InventoryBuilder::new(self.config.group_variables.clone()).build(&vms);
                ctx.inventory = inventory.to_value();
                ctx.inventory.clone()
            }
        };

        if ctx.refreshed()
            && let Err(e) = self.cache.save(&ctx.snapshot())
        {
            warn!(error = %e, "cache not updated");
        }

        Ok(document)
    }

    fn policy(&self) -> CachePolicy {
        CachePolicy {
            force_cache: self.config.options.force_cache,
            refresh_cache: self.config.options.refresh_cache,
            max_age: self.config.cache_max_age,
        }
    }

    /// Seed the run context from the cache
    fn prepare(&self) -> Result<RunContext, CoreError> {
        if self.config.options.force_cache {
            if !self.cache.exists() {
                return Err(CoreError::ForceCacheMissing(
                    self.cache.path().display().to_string(),
                ));
            }
            let snapshot = self.cache.load();
            if snapshot.data.is_empty() {
                return Err(CoreError::ForceCacheEmpty);
            }
            return Ok(RunContext::from_snapshot(snapshot));
        }

        if self.cache.is_valid(self.config.cache_max_age) {
            info!("using cached data");
            return Ok(RunContext::from_snapshot(self.cache.load()));
        }
        Ok(RunContext::new())
    }
}

fn collection_or_null(ctx: &RunContext, resource: Resource) -> Value {
    match ctx.collection(resource) {
        Some(value) => value.clone(),
        None => {
            warn!(resource = %resource, "no data for resource");
            Value::Null
        }
    }
}
