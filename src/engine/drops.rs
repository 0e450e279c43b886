//! Item links in out-of-character chat
use super::*;
use crate::{items::distinct_items, line::ChatLine};
use tracing::debug;

impl Engine {
    /// Record every known item an alliance member links in OOC
    ///
    /// Returns the distinct item names recorded, in order of appearance.
    pub fn handle_ooc(&mut self, chat: &ChatLine, context: ContextRef) -> Vec<ItemName> {
        if !self.is_alliance_member(&chat.speaker) {
            trace!(speaker = %chat.speaker, "ooc from outside the alliance");
            return vec![];
        }

        let found = self.items.find_all(&chat.body);
        if found.is_empty() {
            return vec![];
        }

        self.pending.extend(found.iter().map(|m| {
            ItemDrop::new(m.item.clone(), chat.speaker.clone(), chat.timestamp.clone())
        }));

        let items = distinct_items(&found);
        debug!(speaker = %chat.speaker, ?items, "drops recorded");
        self.notify(context, Notification::DropsRecorded);
        items
    }
}
