//! Notification sinks
//!
//! The engine reports state changes through a [`NotificationSink`]. What the
//! sink does with them (redraw a window, log them, queue them) is its own
//! business; delivery is best-effort and never undoes the state change.
mod in_memory;

pub use self::in_memory::*;

use crate::event::Notification;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Opaque routing key handed back to the sink with every notification
pub type Context = String;
pub type ContextRef<'a> = &'a str;

pub trait NotificationSink {
    fn notify(&self, context: ContextRef, notification: Notification) -> Result<()>;
}

pub type SharedSink = Arc<dyn NotificationSink + Send + Sync + 'static>;

/// Sink that only logs what happened
#[derive(Clone, Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new_shared() -> SharedSink {
        Arc::new(Self)
    }
}

impl NotificationSink for TracingSink {
    fn notify(&self, context: ContextRef, notification: Notification) -> Result<()> {
        match notification {
            Notification::RosterCleared => info!(context, "roster cleared"),
            Notification::RosterEntryChanged(change) => info!(
                context,
                player = %change.player,
                level = %change.level,
                class = %change.class,
                affiliation = ?change.affiliation,
                "roster entry"
            ),
            Notification::DropsRecorded => info!(context, "drops recorded"),
            Notification::BidRecorded(auction) => info!(
                context,
                item = %auction.item(),
                highest = ?auction.highest(),
                "bid recorded"
            ),
        }
        Ok(())
    }
}
