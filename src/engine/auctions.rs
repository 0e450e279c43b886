//! Bids in `/auction` chat, and opening and closing auctions
use super::*;
use crate::{
    auction::{Amount, AuctionError},
    items::{find_name, outermost, ItemMatch},
    line::ChatLine,
};
use tracing::{debug, info};

impl Engine {
    /// Apply a bid from auction chat
    ///
    /// The line must come from an alliance member and name exactly one
    /// item (open for bidding) and exactly one amount. Anything else,
    /// including bids on two items at once, is ignored as a whole rather
    /// than partially applied.
    pub fn handle_auction(&mut self, chat: &ChatLine, context: ContextRef) -> bool {
        if !self.is_alliance_member(&chat.speaker) {
            trace!(speaker = %chat.speaker, "bid from outside the alliance");
            return false;
        }

        let Some((item, amount)) = self.parse_bid(&chat.body) else {
            trace!(speaker = %chat.speaker, body = %chat.body, "not a bid");
            return false;
        };

        let Some(auction) = self.auctions.get_mut(&item) else {
            debug!(speaker = %chat.speaker, %item, "bid on an item not up for auction");
            return false;
        };

        let previous = auction.bid(chat.speaker.clone(), amount);
        debug!(speaker = %chat.speaker, %item, amount, ?previous, "bid recorded");

        let auction = auction.clone();
        self.notify(context, Notification::BidRecorded(auction));
        true
    }

    /// Find the single (item, amount) pair in a bid message
    ///
    /// Items are looked up both in the dictionary and among the open
    /// auctions, the longest name winning where they nest. The amount is
    /// the only run of digits outside item names.
    fn parse_bid(&self, body: &str) -> Option<(ItemName, Amount)> {
        let mut matches = self.items.find_all(body);
        for name in self.auctions.keys() {
            matches.extend(find_name(body, name));
        }
        let matches = outermost(&matches);

        let mut items: Vec<&ItemName> = Vec::new();
        for m in &matches {
            if !items.iter().any(|item| item.eq_ignore_ascii_case(&m.item)) {
                items.push(&m.item);
            }
        }
        let [item] = items.as_slice() else {
            return None;
        };

        let masked = mask_items(body, &matches);
        let mut numbers = masked
            .split(|c: char| !c.is_ascii_digit())
            .filter(|token| !token.is_empty());
        let (Some(amount), None) = (numbers.next(), numbers.next()) else {
            return None;
        };

        let item = self
            .auctions
            .keys()
            .find(|name| name.eq_ignore_ascii_case(item))
            .unwrap_or(*item);
        Some((item.clone(), amount.parse().ok()?))
    }

    /// Open bidding on the pending drop at `index`
    pub fn start_auction(
        &mut self,
        index: usize,
        alliance: impl Into<String>,
    ) -> Result<&DkpAuction, AuctionError> {
        let item = &self
            .pending
            .get(index)
            .ok_or(AuctionError::UnknownDrop(index))?
            .item;
        if self.auctions.contains_key(item) {
            return Err(AuctionError::AlreadyActive(item.clone()));
        }

        let drop = self.pending.remove(index);
        info!(item = %drop.item, player = %drop.player, "auction started");
        let auction: &DkpAuction = self
            .auctions
            .entry(drop.item.clone())
            .or_insert_with(|| DkpAuction::new(drop, alliance));
        Ok(auction)
    }

    /// Close bidding on `item`, returning the final state of its auction
    pub fn complete_auction(&mut self, item: ItemNameRef) -> Result<DkpAuction, AuctionError> {
        let auction = self
            .auctions
            .remove(item)
            .ok_or_else(|| AuctionError::UnknownAuction(item.to_owned()))?;
        info!(item, highest = ?auction.highest(), "auction completed");
        Ok(auction)
    }
}

/// `body` with every matched item name blanked out
fn mask_items(body: &str, matches: &[ItemMatch]) -> String {
    let mut masked = body.as_bytes().to_vec();
    for m in matches {
        masked[m.start..m.end].fill(b' ');
    }
    String::from_utf8_lossy(&masked).into_owned()
}
