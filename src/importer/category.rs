use std::collections::{BTreeSet, HashMap};
use tracing::debug;
use uuid::Uuid;

use super::store::{ImportStore, StoreError};
use crate::auth::{permissions, Actor, Authorizer};

/// Outcome of resolving an explicitly specified category title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Id(Uuid),
    /// Title does not exist and the actor may not create it
    Unauthorized,
}

enum CacheEntry {
    Resolved(Uuid),
    Unauthorized,
}

/// Resolves category titles for one import run.
///
/// Holds a per-run cache so each distinct title hits the datastore at most
/// once; the cache dies with the resolver. Unknown titles are created lazily
/// when the injected authorizer grants `categories:create`, otherwise they
/// accumulate in the unauthorized set. Title matching is case- and
/// whitespace-sensitive beyond the trim every cell receives.
pub struct CategoryResolver<'a> {
    store: &'a dyn ImportStore,
    authorizer: &'a dyn Authorizer,
    actor: &'a Actor,
    cache: HashMap<String, CacheEntry>,
    unauthorized: BTreeSet<String>,
}

impl<'a> CategoryResolver<'a> {
    pub fn new(store: &'a dyn ImportStore, authorizer: &'a dyn Authorizer, actor: &'a Actor) -> Self {
        Self {
            store,
            authorizer,
            actor,
            cache: HashMap::new(),
            unauthorized: BTreeSet::new(),
        }
    }

    pub async fn resolve(&mut self, title: &str) -> Result<Resolution, StoreError> {
        if let Some(entry) = self.cache.get(title) {
            return Ok(match entry {
                CacheEntry::Resolved(id) => Resolution::Id(*id),
                CacheEntry::Unauthorized => Resolution::Unauthorized,
            });
        }

        let resolution = match self.store.find_category(title).await? {
            Some(id) => {
                self.cache
                    .insert(title.to_string(), CacheEntry::Resolved(id));
                Resolution::Id(id)
            }
            None => match self
                .authorizer
                .authorize(self.actor, permissions::CATEGORIES_CREATE)
            {
                Ok(()) => {
                    let id = self.store.create_category(title).await?;
                    debug!(%id, title, "created category during import");
                    self.cache
                        .insert(title.to_string(), CacheEntry::Resolved(id));
                    Resolution::Id(id)
                }
                Err(_) => {
                    self.unauthorized.insert(title.to_string());
                    self.cache
                        .insert(title.to_string(), CacheEntry::Unauthorized);
                    Resolution::Unauthorized
                }
            },
        };

        Ok(resolution)
    }

    /// Titles the actor could not create, ordered for stable reporting
    pub fn into_unauthorized_titles(self) -> BTreeSet<String> {
        self.unauthorized
    }
}
