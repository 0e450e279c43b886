//! Remembered guild affiliations
//!
//! Players hiding their guild tag (anonymous or roleplaying) still show up
//! in `/who`. When the operator knows which guild they belong to, that
//! knowledge lives here and survives roster resets. The engine only ever
//! reads from it.
mod in_memory;

pub use self::in_memory::*;

use crate::auction::{Guild, PlayerNameRef};
use std::sync::Arc;

pub trait AffiliationHistory {
    fn get(&self, player: PlayerNameRef) -> Option<Guild>;
}

pub type SharedAffiliationHistory = Arc<dyn AffiliationHistory + Send + Sync + 'static>;
