//! `/who` handling
use super::*;
use crate::{event::RosterChange, line::RosterEntry};
use tracing::debug;

impl Engine {
    /// A new `/who` listing starts: forget the current roster
    ///
    /// The affiliation history is left alone; it is what lets untagged
    /// players be placed again in the listing that follows.
    pub fn handle_roster_reset(&mut self, context: ContextRef) {
        debug!(players = self.affiliations.len(), "roster reset");
        self.affiliations.clear();
        self.notify(context, Notification::RosterCleared);
    }

    pub fn handle_roster_entry(&mut self, entry: &RosterEntry, context: ContextRef) {
        let affiliation = match &entry.guild {
            Some(guild) => Some(guild.clone()),
            None => self.history.get(&entry.name),
        };

        let previous = self
            .affiliations
            .insert(entry.name.clone(), affiliation.clone());
        if previous.as_ref() != Some(&affiliation) {
            debug!(
                player = %entry.name,
                ?previous,
                ?affiliation,
                "affiliation changed"
            );
        }

        self.notify(
            context,
            Notification::RosterEntryChanged(RosterChange {
                player: entry.name.clone(),
                level: entry.level,
                class: entry.class.clone(),
                affiliation,
            }),
        );
    }
}
