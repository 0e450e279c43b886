//! Engine
//!
//! Owns the session state (who is in which guild, which drops are waiting
//! for an auction, which auctions are open) and turns classified log lines
//! into state changes and notifications.
//!
//! Lines are handled one at a time to completion, so handlers take
//! `&mut self` and nothing in here is locked.
use crate::{
    auction::{DkpAuction, Guild, ItemDrop, ItemName, ItemNameRef, PlayerName, PlayerNameRef},
    config::{Alliance, Config},
    event::Notification,
    history::SharedAffiliationHistory,
    items::ItemMatcher,
    line::{Classifier, LogLine},
    sink::{ContextRef, SharedSink},
};
use anyhow::Result;
use parking_lot::Mutex;
use std::{collections::BTreeMap, sync::Arc};
use tracing::{trace, warn};

mod auctions;
mod drops;
mod roster;

/// What a line turned out to be, and what handling it produced
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Handled {
    RosterCleared,
    RosterEntry,
    /// Distinct items announced in the line; empty when nothing was recorded
    Drops(Vec<ItemName>),
    /// Whether the bid was accepted
    Bid(bool),
}

/// The engine as shared between the log follower and the operator UI
pub type SharedEngine = Arc<Mutex<Engine>>;

pub struct Engine {
    classifier: Classifier,
    items: ItemMatcher,
    alliance: Alliance,
    history: SharedAffiliationHistory,
    sink: SharedSink,

    affiliations: BTreeMap<PlayerName, Option<Guild>>,
    pending: Vec<ItemDrop>,
    auctions: BTreeMap<ItemName, DkpAuction>,
}

impl Engine {
    pub fn new(
        items: ItemMatcher,
        alliance: Alliance,
        history: SharedAffiliationHistory,
        sink: SharedSink,
    ) -> Result<Self> {
        if items.is_empty() {
            warn!("item dictionary is empty, no drops will be detected");
        }
        Ok(Self {
            classifier: Classifier::new()?,
            items,
            alliance,
            history,
            sink,
            affiliations: BTreeMap::new(),
            pending: Vec::new(),
            auctions: BTreeMap::new(),
        })
    }

    pub fn from_config(config: &Config, sink: SharedSink) -> Result<Self> {
        Self::new(
            ItemMatcher::new(config.item_names()?)?,
            config.alliance()?,
            Arc::new(config.history()),
            sink,
        )
    }

    pub fn into_shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    /// Classify `line` and run the matching handler
    ///
    /// Returns `None` for lines that aren't of interest.
    pub fn handle_line(&mut self, line: &str, context: ContextRef) -> Option<Handled> {
        let Some(log_line) = self.classifier.classify(line) else {
            trace!(line, "unrecognized");
            return None;
        };

        Some(match log_line {
            LogLine::RosterReset { .. } => {
                self.handle_roster_reset(context);
                Handled::RosterCleared
            }
            LogLine::RosterEntry(entry) => {
                self.handle_roster_entry(&entry, context);
                Handled::RosterEntry
            }
            LogLine::OutOfCharacter(chat) => Handled::Drops(self.handle_ooc(&chat, context)),
            LogLine::Auction(chat) => Handled::Bid(self.handle_auction(&chat, context)),
        })
    }

    /// Deliver a notification; failures are logged and otherwise ignored
    fn notify(&self, context: ContextRef, notification: Notification) {
        if let Err(e) = self.sink.notify(context, notification) {
            warn!(context, error = %e, "failed to deliver notification");
        }
    }

    /// Whether `player` currently belongs to one of the alliance's guilds
    pub fn is_alliance_member(&self, player: PlayerNameRef) -> bool {
        self.affiliation(player)
            .is_some_and(|guild| self.alliance.contains(guild))
    }

    pub fn alliance(&self) -> &Alliance {
        &self.alliance
    }

    /// Current guild of `player`, `None` if unguilded or never seen
    pub fn affiliation(&self, player: PlayerNameRef) -> Option<&Guild> {
        self.affiliations.get(player)?.as_ref()
    }

    pub fn affiliations(&self) -> &BTreeMap<PlayerName, Option<Guild>> {
        &self.affiliations
    }

    pub fn pending_drops(&self) -> &[ItemDrop] {
        &self.pending
    }

    pub fn active_auctions(&self) -> &BTreeMap<ItemName, DkpAuction> {
        &self.auctions
    }

    pub fn auction(&self, item: ItemNameRef) -> Option<&DkpAuction> {
        self.auctions.get(item)
    }
}
