use super::*;
use crate::engine::Handled;
use crate::{
    auction::{AuctionError, ItemDrop},
    event::Notification,
    sink::{ContextRef, NotificationSink},
};

fn ooc_fixture() -> Result<Fixture> {
    let mut fixture = Fixture::new()?;
    fixture.seat("Jim", Some("Venerate"));
    fixture.seat("James", Some("Kingdom"));
    fixture.seat("Dan", Some("Dial a Daniel"));
    Ok(fixture)
}

#[test]
fn records_items_linked_by_alliance_members() -> Result<()> {
    let mut fixture = ooc_fixture()?;

    // Item linked by a non-alliance guild member
    let items = fixture.engine.handle_line(
        "[Sun Aug 16 22:47:31 2020] Dan says out of character, 'Copper Disc'",
        WINDOW,
    );
    assert_eq!(items, Some(Handled::Drops(vec![])));
    assert!(fixture.engine.pending_drops().is_empty());
    assert!(fixture.sink.is_empty());

    // Item linked by an alliance guild member
    let jim_disc_1 = ItemDrop::new("Copper Disc", "Jim", "Sun Aug 16 22:47:31 2020");
    let items = fixture.engine.handle_line(
        "[Sun Aug 16 22:47:31 2020] Jim says out of character, 'Copper Disc'",
        WINDOW,
    );
    assert_eq!(items, Some(Handled::Drops(vec!["Copper Disc".to_owned()])));
    assert_eq!(fixture.engine.pending_drops(), [jim_disc_1.clone()]);
    assert_eq!(
        fixture.sink.take(),
        vec![(WINDOW.to_owned(), Notification::DropsRecorded)]
    );

    // Two items linked by an alliance guild member, plus chat
    let james_disc_1 = ItemDrop::new("Copper Disc", "James", "Sun Aug 16 22:47:41 2020");
    let james_disc_2 = ItemDrop::new("Platinum Disc", "James", "Sun Aug 16 22:47:41 2020");
    let items = fixture.engine.handle_line(
        "[Sun Aug 16 22:47:41 2020] James says out of character, 'Copper Disc and Platinum Disc woot'",
        WINDOW,
    );
    assert_eq!(
        items,
        Some(Handled::Drops(vec![
            "Copper Disc".to_owned(),
            "Platinum Disc".to_owned()
        ]))
    );
    assert_eq!(
        fixture.engine.pending_drops(),
        [jim_disc_1.clone(), james_disc_1.clone(), james_disc_2.clone()]
    );
    assert_eq!(fixture.sink.notifications(), vec![Notification::DropsRecorded]);
    fixture.sink.take();

    // Random chatter by an alliance guild member
    let items = fixture.engine.handle_line(
        "[Sun Aug 16 22:47:31 2020] Jim says out of character, 'four score and seven years ago, we wanted pixels'",
        WINDOW,
    );
    assert_eq!(items, Some(Handled::Drops(vec![])));
    assert_eq!(fixture.engine.pending_drops().len(), 3);
    assert!(fixture.sink.is_empty());

    // Some bad line is passed somehow
    assert_eq!(fixture.engine.handle_line("???", WINDOW), None);
    assert_eq!(
        fixture.engine.pending_drops(),
        [jim_disc_1, james_disc_1, james_disc_2]
    );
    assert!(fixture.sink.is_empty());
    Ok(())
}

#[test]
fn unknown_speaker_is_not_trusted() -> Result<()> {
    let mut fixture = ooc_fixture()?;

    let items = fixture.engine.handle_line(
        "[Sun Aug 16 22:47:31 2020] Paul says out of character, 'Copper Disc'",
        WINDOW,
    );
    assert_eq!(items, Some(Handled::Drops(vec![])));
    assert!(fixture.engine.pending_drops().is_empty());
    assert!(fixture.sink.is_empty());
    Ok(())
}

#[test]
fn repeated_links_are_kept_apart() -> Result<()> {
    let mut fixture = ooc_fixture()?;

    let items = fixture.engine.handle_line(
        "[Sun Aug 16 22:48:00 2020] Jim says out of character, 'copper disc, COPPER DISC!'",
        WINDOW,
    );
    assert_eq!(items, Some(Handled::Drops(vec!["Copper Disc".to_owned()])));
    fixture.engine.handle_line(
        "[Sun Aug 16 22:48:05 2020] Jim says out of character, 'Copper Disc'",
        WINDOW,
    );

    assert_eq!(
        fixture.engine.pending_drops(),
        [
            ItemDrop::new("Copper Disc", "Jim", "Sun Aug 16 22:48:00 2020"),
            ItemDrop::new("Copper Disc", "Jim", "Sun Aug 16 22:48:00 2020"),
            ItemDrop::new("Copper Disc", "Jim", "Sun Aug 16 22:48:05 2020"),
        ]
    );
    assert_eq!(
        fixture.sink.notifications(),
        vec![Notification::DropsRecorded, Notification::DropsRecorded]
    );
    Ok(())
}

#[test]
fn pending_drops_are_promoted_to_auctions() -> Result<()> {
    let mut fixture = ooc_fixture()?;
    fixture.engine.handle_line(
        "[Sun Aug 16 22:47:41 2020] James says out of character, 'Copper Disc and Platinum Disc woot'",
        WINDOW,
    );
    fixture.engine.handle_line(
        "[Sun Aug 16 22:47:50 2020] Jim says out of character, 'Copper Disc'",
        WINDOW,
    );

    let auction = fixture.engine.start_auction(1, "VCR")?;
    assert_eq!(auction.item(), "Platinum Disc");
    assert_eq!(auction.alliance, "VCR");
    assert_eq!(auction.highest(), None);
    assert_eq!(fixture.engine.pending_drops().len(), 2);

    fixture.engine.start_auction(0, "VCR")?;
    assert_eq!(
        fixture.engine.start_auction(0, "VCR").map(|a| a.item().to_owned()),
        Err(AuctionError::AlreadyActive("Copper Disc".to_owned()))
    );
    assert_eq!(
        fixture.engine.start_auction(5, "VCR").map(|a| a.item().to_owned()),
        Err(AuctionError::UnknownDrop(5))
    );
    // a refused promotion leaves the drop pending
    assert_eq!(
        fixture.engine.pending_drops(),
        [ItemDrop::new("Copper Disc", "Jim", "Sun Aug 16 22:47:50 2020")]
    );
    assert_eq!(fixture.engine.active_auctions().len(), 2);

    let done = fixture.engine.complete_auction("Copper Disc")?;
    assert_eq!(done.drop, ItemDrop::new("Copper Disc", "James", "Sun Aug 16 22:47:41 2020"));
    assert_eq!(fixture.engine.active_auctions().len(), 1);
    assert_eq!(
        fixture.engine.complete_auction("Copper Disc"),
        Err(AuctionError::UnknownAuction("Copper Disc".to_owned()))
    );
    Ok(())
}

struct ClosedWindow;

impl NotificationSink for ClosedWindow {
    fn notify(&self, _context: ContextRef, _notification: Notification) -> Result<()> {
        anyhow::bail!("window closed")
    }
}

#[test]
fn failed_notification_keeps_the_drop() -> Result<()> {
    let history = InMemoryAffiliationHistory::new_shared();
    history.insert("Jim", "Venerate");
    let mut engine = Engine::new(
        ItemMatcher::new(ITEMS)?,
        vcr(),
        history,
        Arc::new(ClosedWindow),
    )?;

    engine.handle_line("[Sun Aug 16 22:46:32 2020] [ANONYMOUS] Jim (Gnome)", WINDOW);
    let items = engine.handle_line(
        "[Sun Aug 16 22:47:31 2020] Jim says out of character, 'Copper Disc'",
        WINDOW,
    );

    assert_eq!(items, Some(Handled::Drops(vec!["Copper Disc".to_owned()])));
    assert_eq!(engine.pending_drops().len(), 1);
    Ok(())
}
