//! Unit tests for resting-order bookkeeping: add, cancel, index integrity.

use crate::orderbook::{OrderBook, OrderBookError};
use crate::types::{Order, Side};

fn limit(id: u64, side: Side, price: i64, quantity: i64) -> Order {
    Order::limit(id, 1, side, price, quantity, 0)
}

#[test]
fn add_order_updates_best_prices() {
    let mut book = OrderBook::new("TEST");
    assert_eq!(book.best_bid(), None);
    assert_eq!(book.best_ask(), None);

    book.add_order(limit(1, Side::Buy, 100, 10)).unwrap();
    book.add_order(limit(2, Side::Buy, 99, 10)).unwrap();
    book.add_order(limit(3, Side::Sell, 101, 5)).unwrap();
    book.add_order(limit(4, Side::Sell, 103, 5)).unwrap();

    assert_eq!(book.best_bid(), Some(100));
    assert_eq!(book.best_ask(), Some(101));
    assert_eq!(book.order_count(), 4);
}

#[test]
fn add_order_rejects_invalid_orders() {
    let mut book = OrderBook::new("TEST");

    let market = Order::market(1, 1, Side::Buy, 10, 0);
    assert_eq!(
        book.add_order(market),
        Err(OrderBookError::InvalidOrderType { order_id: 1 })
    );

    assert_eq!(
        book.add_order(limit(2, Side::Buy, 0, 10)),
        Err(OrderBookError::InvalidPrice {
            order_id: 2,
            price: 0
        })
    );
    assert_eq!(
        book.add_order(limit(3, Side::Buy, -7, 10)),
        Err(OrderBookError::InvalidPrice {
            order_id: 3,
            price: -7
        })
    );
    assert_eq!(
        book.add_order(limit(4, Side::Sell, 100, 0)),
        Err(OrderBookError::InvalidQuantity {
            order_id: 4,
            quantity: 0
        })
    );

    assert!(book.is_empty());
    assert_eq!(book.best_bid(), None);
}

#[test]
fn cancel_removes_order_and_is_silent_on_repeat() {
    let mut book = OrderBook::new("TEST");
    book.add_order(limit(1, Side::Buy, 100, 10)).unwrap();

    assert!(book.contains(1));
    assert!(book.cancel_order(1));
    assert!(!book.contains(1));
    assert_eq!(book.best_bid(), None);

    // Second cancel of the same id: silent false, never a panic.
    assert!(!book.cancel_order(1));
    assert!(!book.cancel_order(42));
}

#[test]
fn cancel_drains_level_without_ghosts() {
    let mut book = OrderBook::new("TEST");
    book.add_order(limit(1, Side::Sell, 101, 5)).unwrap();
    book.add_order(limit(2, Side::Sell, 101, 7)).unwrap();
    book.add_order(limit(3, Side::Sell, 102, 9)).unwrap();

    assert!(book.cancel_order(1));
    let asks = book.snapshot_asks(0);
    assert_eq!(asks.len(), 2);
    assert_eq!(asks[0].price, 101);
    assert_eq!(asks[0].total_quantity, 7);
    assert_eq!(asks[0].order_count, 1);

    // Cancelling the remaining order removes the level entirely; no level
    // with zero quantity may ever appear in a snapshot.
    assert!(book.cancel_order(2));
    let asks = book.snapshot_asks(0);
    assert_eq!(asks.len(), 1);
    assert_eq!(asks[0].price, 102);
    assert_eq!(book.best_ask(), Some(102));
}

#[test]
fn cancel_preserves_time_priority_of_survivors() {
    let mut book = OrderBook::new("TEST");
    book.add_order(limit(1, Side::Buy, 100, 10)).unwrap();
    book.add_order(limit(2, Side::Buy, 100, 20)).unwrap();
    book.add_order(limit(3, Side::Buy, 100, 30)).unwrap();

    book.cancel_order(2);

    // The survivors keep their arrival order: a contra sweep must fill
    // id 1 before id 3.
    let mut taker = Order::market(9, 1, Side::Sell, 15, 0);
    let trades = book.match_order(&mut taker);
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].maker_id, 1);
    assert_eq!(trades[0].quantity, 10);
    assert_eq!(trades[1].maker_id, 3);
    assert_eq!(trades[1].quantity, 5);
}

#[test]
fn cancel_index_matches_resting_state() {
    let mut book = OrderBook::new("TEST");
    for id in 1..=6u64 {
        let side = if id % 2 == 0 { Side::Buy } else { Side::Sell };
        let price = if side == Side::Buy { 100 } else { 105 };
        book.add_order(limit(id, side, price, id as i64 * 10)).unwrap();
    }

    for id in 1..=6u64 {
        assert!(book.contains(id));
        assert_eq!(book.resting_quantity(id), Some(id as i64 * 10));
    }

    book.cancel_order(3);
    book.cancel_order(4);
    assert!(!book.contains(3));
    assert_eq!(book.resting_quantity(4), None);
    assert_eq!(book.order_count(), 4);

    // Aggregates agree with the surviving index entries.
    let bid_total: i64 = book.snapshot_bids(0).iter().map(|l| l.total_quantity).sum();
    let ask_total: i64 = book.snapshot_asks(0).iter().map(|l| l.total_quantity).sum();
    assert_eq!(bid_total, 20 + 60);
    assert_eq!(ask_total, 10 + 50);
}

#[test]
fn last_trade_price_starts_unset() {
    let mut book = OrderBook::new("TEST");
    assert_eq!(book.last_trade_price(), None);
    book.add_order(limit(1, Side::Buy, 100, 10)).unwrap();
    // Resting alone is not a trade.
    assert_eq!(book.last_trade_price(), None);
}
