//! Unit tests for L2 snapshots.

use crate::orderbook::OrderBook;
use crate::types::{Order, Side};

fn populated_book() -> OrderBook {
    let mut book = OrderBook::new("SNAP");
    let mut id = 0u64;
    // Three bid levels, two orders each.
    for price in [100, 99, 98] {
        for quantity in [10, 20] {
            id += 1;
            book.add_order(Order::limit(id, 1, Side::Buy, price, quantity, 0))
                .unwrap();
        }
    }
    // Two ask levels.
    for price in [101, 102] {
        id += 1;
        book.add_order(Order::limit(id, 1, Side::Sell, price, 7, 0))
            .unwrap();
    }
    book
}

#[test]
fn levels_come_back_in_ladder_order() {
    let book = populated_book();
    let bids = book.snapshot_bids(0);
    let asks = book.snapshot_asks(0);

    assert_eq!(bids.iter().map(|l| l.price).collect::<Vec<_>>(), vec![100, 99, 98]);
    assert_eq!(asks.iter().map(|l| l.price).collect::<Vec<_>>(), vec![101, 102]);
}

#[test]
fn levels_aggregate_quantity_and_count() {
    let book = populated_book();
    let bids = book.snapshot_bids(0);
    for level in &bids {
        assert_eq!(level.total_quantity, 30);
        assert_eq!(level.order_count, 2);
    }
}

#[test]
fn depth_limits_levels_and_zero_means_all() {
    let book = populated_book();
    assert_eq!(book.snapshot_bids(2).len(), 2);
    assert_eq!(book.snapshot_bids(0).len(), 3);
    assert_eq!(book.snapshot_bids(10).len(), 3);
    assert_eq!(book.snapshot_asks(1)[0].price, 101);
}

#[test]
fn snapshot_mirrors_resting_orders_exactly() {
    let mut book = populated_book();
    book.cancel_order(1);

    // Rebuild the per-level totals from the index side and compare.
    let bids = book.snapshot_bids(0);
    let total_from_snapshot: i64 = bids.iter().map(|l| l.total_quantity).sum();
    let count_from_snapshot: usize = bids.iter().map(|l| l.order_count).sum();

    let ids: Vec<u64> = (1..=6).filter(|id| book.contains(*id)).collect();
    let total_from_index: i64 = ids
        .iter()
        .filter_map(|id| book.resting_quantity(*id))
        .sum();

    assert_eq!(total_from_snapshot, total_from_index);
    assert_eq!(count_from_snapshot, ids.len());
}

#[test]
fn full_snapshot_has_both_sides_and_helpers() {
    let book = populated_book();
    let snapshot = book.snapshot(0);

    assert_eq!(snapshot.symbol, "SNAP");
    assert_eq!(snapshot.best_bid(), Some((100, 30)));
    assert_eq!(snapshot.best_ask(), Some((101, 7)));
    assert_eq!(snapshot.spread(), Some(1));
    assert_eq!(snapshot.mid_price(), Some(100.5));
}

#[test]
fn empty_snapshot_helpers_return_none() {
    let book = OrderBook::new("EMPTY");
    let snapshot = book.snapshot(0);
    assert_eq!(snapshot.best_bid(), None);
    assert_eq!(snapshot.best_ask(), None);
    assert_eq!(snapshot.mid_price(), None);
    assert_eq!(snapshot.spread(), None);
}

#[test]
fn snapshot_serializes_to_json() {
    let book = populated_book();
    let snapshot = book.snapshot(1);
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["symbol"], "SNAP");
    assert_eq!(json["bids"][0]["price"], 100);
    assert_eq!(json["bids"][0]["total_quantity"], 30);
    assert_eq!(json["asks"][0]["order_count"], 1);
}
