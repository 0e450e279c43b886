use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

pub type ItemName = String;
pub type ItemNameRef<'s> = &'s str;
pub type PlayerName = String;
pub type PlayerNameRef<'s> = &'s str;
pub type Guild = String;
pub type GuildRef<'s> = &'s str;
pub type Amount = u64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuctionError {
    #[error("no pending drop at position {0}")]
    UnknownDrop(usize),
    #[error("auction already running: {0}")]
    AlreadyActive(ItemName),
    #[error("unknown auction: {0}")]
    UnknownAuction(ItemName),
}

/// An item seen linked in out-of-character chat by an alliance member
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemDrop {
    pub item: ItemName,
    pub player: PlayerName,
    /// Timestamp exactly as it appeared in the log
    pub timestamp: String,
}

impl ItemDrop {
    pub fn new(
        item: impl Into<ItemName>,
        player: impl Into<PlayerName>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            item: item.into(),
            player: player.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// A single bidder's standing bid
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Bid {
    pub bidder: PlayerName,
    pub amount: Amount,
}

/// A DKP auction for one dropped item, run by an alliance
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DkpAuction {
    pub drop: ItemDrop,
    pub alliance: String,
    bids: BTreeMap<PlayerName, Amount>,
}

impl DkpAuction {
    pub fn new(drop: ItemDrop, alliance: impl Into<String>) -> Self {
        Self {
            drop,
            alliance: alliance.into(),
            bids: BTreeMap::new(),
        }
    }

    pub fn item(&self) -> ItemNameRef<'_> {
        &self.drop.item
    }

    /// Record `amount` as `bidder`'s bid, replacing any earlier one
    ///
    /// Returns the bidder's previous amount, if any.
    pub fn bid(&mut self, bidder: impl Into<PlayerName>, amount: Amount) -> Option<Amount> {
        self.bids.insert(bidder.into(), amount)
    }

    pub fn bids(&self) -> impl Iterator<Item = Bid> + '_ {
        self.bids.iter().map(|(bidder, &amount)| Bid {
            bidder: bidder.clone(),
            amount,
        })
    }

    /// All bids tied at the maximum amount, or `None` before the first bid
    pub fn highest(&self) -> Option<BTreeSet<Bid>> {
        let max = *self.bids.values().max()?;
        Some(self.bids().filter(|bid| bid.amount == max).collect())
    }
}
