//! Ledger tests — capacity, identifier assignment, close routing, and the
//! balance/equity split.

use fxledger_core::domain::{PositionId, PositionSpec, Side, Tick};
use fxledger_core::ledger::{LedgerError, PositionManager};

fn buy_spec() -> PositionSpec {
    PositionSpec::new(1.0, 1.0, Side::Buy)
        .with_target(1.1)
        .with_stoploss(0.9)
}

#[test]
fn new_manager_holds_its_settings() {
    let manager = PositionManager::new(100.0, 1);
    assert_eq!(manager.start_balance(), 100.0);
    assert_eq!(manager.max_positions(), 1);
    assert!(manager.positions().is_empty());
}

#[test]
fn open_returns_the_created_position() {
    let mut manager = PositionManager::new(100.0, 1);
    let position = manager
        .open("01/01/2000, 00:00:00", buy_spec(), None)
        .unwrap()
        .expect("one slot free");
    assert_eq!(position.entry, 1.0);
    assert_eq!(manager.positions().len(), 1);
}

#[test]
fn zero_capacity_rejects_every_open() {
    let mut manager = PositionManager::new(100.0, 0);
    for _ in 0..3 {
        let created = manager.open("01/01/2000, 00:00:00", buy_spec(), None).unwrap();
        assert!(created.is_none());
    }
    assert!(manager.positions().is_empty());
}

#[test]
fn capacity_counts_closed_positions_too() {
    // Closed positions stay in the ledger, so they keep occupying a slot.
    let mut manager = PositionManager::new(100.0, 1);
    let id = manager
        .open("01/01/2000, 00:00:00", buy_spec(), None)
        .unwrap()
        .unwrap()
        .id;
    manager.close(1.05, 1.05, Some(&id)).unwrap();

    let created = manager.open("01/01/2000, 00:00:01", buy_spec(), None).unwrap();
    assert!(created.is_none());
}

#[test]
fn generated_identifiers_are_unique_and_resolvable() {
    let mut manager = PositionManager::new(100.0, 8);
    let mut ids = Vec::new();
    for _ in 0..8 {
        ids.push(
            manager
                .open("01/01/2000, 00:00:00", buy_spec(), None)
                .unwrap()
                .unwrap()
                .id,
        );
    }

    for (at, id) in ids.iter().enumerate() {
        assert!(ids.iter().skip(at + 1).all(|other| other != id));
        assert!(manager.get_position(id).is_ok());
    }
}

#[test]
fn get_position_unknown_identifier_is_an_error() {
    let mut manager = PositionManager::new(100.0, 1);
    manager.open("01/01/2000, 00:00:00", buy_spec(), None).unwrap();
    assert!(matches!(
        manager.get_position(&PositionId::new()),
        Err(LedgerError::UnknownPosition(_))
    ));
}

#[test]
fn close_by_identifier_leaves_the_rest_open() {
    let mut manager = PositionManager::new(100.0, 2);
    let first = manager
        .open("01/01/2000, 00:00:00", buy_spec(), None)
        .unwrap()
        .unwrap()
        .id;
    let second = manager
        .open("01/01/2000, 00:00:00", buy_spec(), None)
        .unwrap()
        .unwrap()
        .id;

    manager.close(1.01, 1.02, Some(&first)).unwrap();

    assert!(manager.get_position(&first).unwrap().is_closed());
    assert!(manager.get_position(&second).unwrap().is_open());

    // Flatten the remainder.
    manager.close(1.01, 1.02, None).unwrap();
    assert!(manager.get_position(&second).unwrap().is_closed());
    assert_eq!(manager.open_count(), 0);
}

#[test]
fn bulk_close_does_not_reprice_already_closed_positions() {
    let mut manager = PositionManager::new(100.0, 2);
    let first = manager
        .open("01/01/2000, 00:00:00", buy_spec(), None)
        .unwrap()
        .unwrap()
        .id;
    manager.open("01/01/2000, 00:00:00", buy_spec(), None).unwrap();

    manager.close(1.05, 1.05, Some(&first)).unwrap();
    let settled = manager.get_position(&first).unwrap().pnl;
    let stamp = manager.get_position(&first).unwrap().close_date.clone();

    manager.close(0.95, 0.95, None).unwrap();

    let closed_first = manager.get_position(&first).unwrap();
    assert_eq!(closed_first.pnl, settled);
    assert_eq!(closed_first.close_date, stamp);
}

#[test]
fn close_with_unknown_identifier_is_an_error() {
    let mut manager = PositionManager::new(100.0, 1);
    manager.open("01/01/2000, 00:00:00", buy_spec(), None).unwrap();
    assert!(manager.close(1.01, 1.02, Some(&PositionId::new())).is_err());
}

#[test]
fn balance_counts_realized_pnl_only() {
    let mut manager = PositionManager::new(100.0, 2);
    let first = manager
        .open("01/01/2000, 00:00:00", buy_spec(), None)
        .unwrap()
        .unwrap()
        .id;
    manager.close(1.1, 1.11, Some(&first)).unwrap();

    let second = manager
        .open("01/01/2000, 00:00:00", buy_spec(), None)
        .unwrap()
        .unwrap()
        .id;
    manager
        .get_position_mut(&second)
        .unwrap()
        .update_by_tick(&Tick {
            date: "01/01/2000, 00:00:01".into(),
            bid: 1.09,
            ask: 1.098,
        });

    assert_eq!(manager.balance(), 100.0 + 10000.0);
}

#[test]
fn equity_adds_open_mark_to_market() {
    let mut manager = PositionManager::new(100.0, 2);
    let first = manager
        .open("01/01/2000, 00:00:00", buy_spec(), None)
        .unwrap()
        .unwrap()
        .id;
    manager.close(1.1, 1.11, Some(&first)).unwrap();

    let second = manager
        .open("01/01/2000, 00:00:00", buy_spec(), None)
        .unwrap()
        .unwrap()
        .id;
    manager
        .get_position_mut(&second)
        .unwrap()
        .update_by_tick(&Tick {
            date: "01/01/2000, 00:00:01".into(),
            bid: 1.09,
            ask: 1.098,
        });

    assert_eq!(manager.equity(), 100.0 + 10000.0 + 9000.0);
}

#[test]
fn manager_routes_feed_records_to_open_positions() {
    let mut manager = PositionManager::new(100.0, 2);
    let stopped = manager
        .open("01/01/2000, 00:00:00", buy_spec(), None)
        .unwrap()
        .unwrap()
        .id;
    let runner = manager
        .open("01/01/2000, 00:00:00", PositionSpec::new(1.0, 1.0, Side::Buy), None)
        .unwrap()
        .unwrap()
        .id;

    manager.update_by_tick(&Tick {
        date: "01/01/2000, 00:00:01".into(),
        bid: 0.89,
        ask: 0.892,
    });

    assert!(manager.get_position(&stopped).unwrap().is_closed());
    let still_open = manager.get_position(&runner).unwrap();
    assert!(still_open.is_open());
    assert_eq!(still_open.pnl, -11000.0);
}
