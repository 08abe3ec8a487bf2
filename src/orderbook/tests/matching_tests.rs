//! Unit tests for the price-time matching loop.

use crate::orderbook::OrderBook;
use crate::types::{Order, OrderType, Price, Side};

fn limit(id: u64, side: Side, price: i64, quantity: i64) -> Order {
    Order::limit(id, 1, side, price, quantity, 0)
}

/// Runs one order through match-then-rest the way the engine does.
fn process(book: &mut OrderBook, mut order: Order) -> Vec<crate::types::Trade> {
    let trades = book.match_order(&mut order);
    if order.kind == OrderType::Limit && order.quantity > 0 {
        book.add_order(order).unwrap();
    }
    trades
}

#[test]
fn can_match_predicate() {
    // Market orders always cross.
    assert!(OrderBook::can_match(Side::Buy, Price::MAX, 101, OrderType::Market));
    assert!(OrderBook::can_match(Side::Sell, Price::MIN, 101, OrderType::Market));

    // Limit buy crosses at or above the maker price.
    assert!(OrderBook::can_match(Side::Buy, 101, 101, OrderType::Limit));
    assert!(OrderBook::can_match(Side::Buy, 102, 101, OrderType::Limit));
    assert!(!OrderBook::can_match(Side::Buy, 100, 101, OrderType::Limit));

    // Limit sell crosses at or below the maker price.
    assert!(OrderBook::can_match(Side::Sell, 100, 100, OrderType::Limit));
    assert!(OrderBook::can_match(Side::Sell, 99, 100, OrderType::Limit));
    assert!(!OrderBook::can_match(Side::Sell, 101, 100, OrderType::Limit));
}

#[test]
fn non_crossing_limits_rest_without_trades() {
    let mut book = OrderBook::new("TEST");
    let trades = process(&mut book, limit(1, Side::Buy, 100, 10));
    assert!(trades.is_empty());
    let trades = process(&mut book, limit(2, Side::Sell, 101, 5));
    assert!(trades.is_empty());

    assert_eq!(book.best_bid(), Some(100));
    assert_eq!(book.best_ask(), Some(101));
    assert_eq!(book.last_trade_price(), None);
}

#[test]
fn partial_fill_rests_residual_on_taker_side() {
    let mut book = OrderBook::new("TEST");
    process(&mut book, limit(2, Side::Sell, 101, 5));

    let trades = process(&mut book, limit(3, Side::Buy, 102, 8));
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].maker_id, 2);
    assert_eq!(trades[0].taker_id, 3);
    // Execution happens at the resting price, not the aggressive one.
    assert_eq!(trades[0].price, 101);
    assert_eq!(trades[0].quantity, 5);

    assert_eq!(book.best_ask(), None);
    let bids = book.snapshot_bids(0);
    assert_eq!(bids.len(), 1);
    assert_eq!((bids[0].price, bids[0].total_quantity, bids[0].order_count), (102, 3, 1));
    assert_eq!(book.last_trade_price(), Some(101));
}

#[test]
fn market_order_sweeps_multiple_levels() {
    let mut book = OrderBook::new("TEST");
    process(&mut book, limit(1, Side::Sell, 101, 5));
    process(&mut book, limit(2, Side::Sell, 102, 4));

    let mut taker = Order::market(3, 1, Side::Buy, 7, 0);
    let trades = book.match_order(&mut taker);
    assert_eq!(trades.len(), 2);
    assert_eq!((trades[0].maker_id, trades[0].price, trades[0].quantity), (1, 101, 5));
    assert_eq!((trades[1].maker_id, trades[1].price, trades[1].quantity), (2, 102, 2));

    let asks = book.snapshot_asks(0);
    assert_eq!(asks.len(), 1);
    assert_eq!((asks[0].price, asks[0].total_quantity), (102, 2));
    assert_eq!(book.best_bid(), None);
    assert!(!book.contains(3));
}

#[test]
fn equal_price_levels_fill_in_arrival_order() {
    let mut book = OrderBook::new("TEST");
    process(&mut book, limit(1, Side::Buy, 100, 10));
    process(&mut book, limit(2, Side::Buy, 100, 5));

    let mut taker = Order::market(3, 1, Side::Sell, 12, 0);
    let trades = book.match_order(&mut taker);
    assert_eq!(trades.len(), 2);
    assert_eq!((trades[0].maker_id, trades[0].quantity), (1, 10));
    assert_eq!((trades[1].maker_id, trades[1].quantity), (2, 2));

    let bids = book.snapshot_bids(0);
    assert_eq!((bids[0].price, bids[0].total_quantity, bids[0].order_count), (100, 3, 1));
    assert_eq!(book.resting_quantity(2), Some(3));
    assert!(!book.contains(1));
}

#[test]
fn limit_taker_stops_at_its_price() {
    let mut book = OrderBook::new("TEST");
    process(&mut book, limit(1, Side::Sell, 101, 5));
    process(&mut book, limit(2, Side::Sell, 103, 5));

    // Crosses 101 but not 103; the rest of the taker rests at 102.
    let trades = process(&mut book, limit(3, Side::Buy, 102, 8));
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].price, 101);
    assert_eq!(trades[0].quantity, 5);

    assert_eq!(book.best_bid(), Some(102));
    assert_eq!(book.best_ask(), Some(103));
    assert_eq!(book.resting_quantity(3), Some(3));
}

#[test]
fn matching_skips_cancelled_front_orders() {
    let mut book = OrderBook::new("TEST");
    process(&mut book, limit(1, Side::Buy, 100, 10));
    process(&mut book, limit(2, Side::Buy, 100, 20));
    book.cancel_order(1);

    let mut taker = Order::market(3, 1, Side::Sell, 5, 0);
    let trades = book.match_order(&mut taker);
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].maker_id, 2);
    assert_eq!(book.resting_quantity(2), Some(15));
}

#[test]
fn fully_filled_maker_leaves_book_and_index() {
    let mut book = OrderBook::new("TEST");
    process(&mut book, limit(1, Side::Sell, 101, 5));

    let trades = process(&mut book, limit(2, Side::Buy, 101, 5));
    assert_eq!(trades.len(), 1);
    assert!(!book.contains(1));
    assert!(!book.contains(2));
    assert!(book.is_empty());
    // A fully consumed taker id never appears in the book either.
    assert_eq!(book.best_bid(), None);
    assert_eq!(book.best_ask(), None);
}

#[test]
fn book_never_crosses_at_rest() {
    let mut book = OrderBook::new("TEST");
    let orders = [
        limit(1, Side::Buy, 100, 10),
        limit(2, Side::Sell, 99, 3),
        limit(3, Side::Buy, 101, 4),
        limit(4, Side::Sell, 98, 20),
        limit(5, Side::Buy, 97, 6),
        limit(6, Side::Sell, 97, 9),
    ];
    for order in orders {
        process(&mut book, order);
        if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
            assert!(bid < ask, "crossed book: bid {bid} >= ask {ask}");
        }
    }
}

#[test]
fn market_order_on_empty_book_trades_nothing() {
    let mut book = OrderBook::new("TEST");
    let mut taker = Order::market(1, 1, Side::Buy, 10, 0);
    let trades = book.match_order(&mut taker);
    assert!(trades.is_empty());
    assert_eq!(taker.quantity, 10);
    assert!(book.is_empty());
}
