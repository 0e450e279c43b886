use super::*;
use crate::auction::PlayerName;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct InMemoryAffiliationHistory {
    store: RwLock<BTreeMap<PlayerName, Guild>>,
}

impl InMemoryAffiliationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn insert(&self, player: impl Into<PlayerName>, guild: impl Into<Guild>) -> Option<Guild> {
        self.store.write().insert(player.into(), guild.into())
    }

    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }
}

impl FromIterator<(PlayerName, Guild)> for InMemoryAffiliationHistory {
    fn from_iter<T: IntoIterator<Item = (PlayerName, Guild)>>(iter: T) -> Self {
        Self {
            store: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl AffiliationHistory for InMemoryAffiliationHistory {
    fn get(&self, player: PlayerNameRef) -> Option<Guild> {
        self.store.read().get(player).cloned()
    }
}
