use crate::auction::{DkpAuction, Guild, PlayerName};
use crate::line::Level;

/// State transitions reported to the presentation layer
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    /// A new `/who` listing started; the roster was emptied
    RosterCleared,
    /// A player showed up in a `/who` listing
    RosterEntryChanged(RosterChange),
    /// New drops were appended to the pending queue
    DropsRecorded,
    /// A bid was placed; carries the auction after the update
    BidRecorded(DkpAuction),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterChange {
    pub player: PlayerName,
    pub level: Level,
    pub class: String,
    pub affiliation: Option<Guild>,
}
