//! Fetch-or-cache decisions per resource

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, instrument};

use pcinv_api::Resource;
use pcinv_client::PrismApi;

use crate::cache::{CacheSnapshot, CacheStore};

/// Which collections a mode needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    One(Resource),
    All,
}

impl Selection {
    fn resources(self) -> Vec<Resource> {
        match self {
            Selection::One(resource) => vec![resource],
            Selection::All => Resource::ALL.to_vec(),
        }
    }

    /// VMs are fetched on every run regardless of cache age
    fn includes_vms(self) -> bool {
        matches!(self, Selection::All | Selection::One(Resource::Vms))
    }
}

/// Data accumulated during one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunContext {
    pub data: IndexMap<Resource, Value>,
    /// Last built inventory, `{}` until one exists
    pub inventory: Value,
    refreshed: bool,
}

impl RunContext {
    #[must_use]
    pub fn new() -> Self {
        Self::from_snapshot(CacheSnapshot::default())
    }

    /// Seed the run with cached data
    #[must_use]
    pub fn from_snapshot(snapshot: CacheSnapshot) -> Self {
        Self {
            data: snapshot.data,
            inventory: snapshot.inventory,
            refreshed: false,
        }
    }

    /// Whether any collection was fetched from the API this run
    #[must_use]
    pub fn refreshed(&self) -> bool {
        self.refreshed
    }

    #[must_use]
    pub fn collection(&self, resource: Resource) -> Option<&Value> {
        self.data.get(&resource)
    }

    #[must_use]
    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            data: self.data.clone(),
            inventory: self.inventory.clone(),
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache switches from the command line plus the freshness window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachePolicy {
    pub force_cache: bool,
    pub refresh_cache: bool,
    pub max_age: u64,
}

/// Decides, per selection, between the API and already loaded cache data
pub struct ResourceLoader<'a, A: PrismApi + ?Sized> {
    api: &'a A,
    cache: &'a CacheStore,
    policy: CachePolicy,
}

impl<'a, A: PrismApi + ?Sized> ResourceLoader<'a, A> {
    pub fn new(api: &'a A, cache: &'a CacheStore, policy: CachePolicy) -> Self {
        Self { api, cache, policy }
    }

    /// Make the selected collections available in `ctx`
    ///
    /// - `force_cache` with a cache file: never fetch.
    /// - Valid cache already holding a single non-VM resource: keep it.
    /// - Otherwise fetch; `refresh_cache` widens the selection to all.
    #[instrument(skip(self, ctx))]
    pub async fn load(&self, ctx: &mut RunContext, selection: Selection) {
        if self.policy.force_cache && self.cache.exists() {
            debug!("force-cache set, using cached data only");
            return;
        }

        let selection = if self.policy.refresh_cache {
            Selection::All
        } else {
            selection
        };

        if !self.policy.refresh_cache
            && !selection.includes_vms()
            && selection.resources().iter().all(|r| ctx.data.contains_key(r))
            && self.cache.is_valid(self.policy.max_age)
        {
            debug!("cache valid, fetch skipped");
            return;
        }

        for resource in selection.resources() {
            info!(resource = %resource, "fetching from Prism Central");
            let response = self.api.list(resource).await;
            ctx.data.insert(resource, response.into_value());
            ctx.refreshed = true;
        }
    }
}
