//! Line-oriented request parsing and response formatting.
//!
//! Requests are newline-terminated ASCII; responses are newline-terminated
//! ASCII, possibly spanning multiple lines. The exact response strings are
//! part of the wire contract and are matched by existing gateways, so they
//! are not reworded.

use crate::manager::InstrumentManager;
use crate::types::{market_sentinel, Order, OrderType, Price, Quantity, Side, SymbolId};
use crate::utils::monotonic_nanos;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

/// L2 depth used by the `SNAPSHOT` command.
pub const SNAPSHOT_DEPTH: usize = 10;

/// Handles one request line and returns the full response, including the
/// trailing newline(s). `next_order_id` is the server-wide order id source.
pub fn process_request(
    service: &InstrumentManager,
    next_order_id: &AtomicU64,
    line: &str,
) -> String {
    let trimmed = line.trim();
    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    };

    match command {
        "ADD_INSTRUMENT" => add_instrument(service, rest),
        "REMOVE_INSTRUMENT" => remove_instrument(service, rest),
        "LIST_INSTRUMENTS" => list_instruments(service),
        "ADD" => add_order(service, next_order_id, rest),
        "CANCEL" => cancel_order(service, rest),
        "SNAPSHOT" => snapshot(service, rest),
        _ => "ERROR Unknown command\n".to_string(),
    }
}

/// `ADD_INSTRUMENT <ticker>|<description>|<industry>|<initial_price>`
fn add_instrument(service: &InstrumentManager, payload: &str) -> String {
    let parts: Vec<&str> = payload.split('|').map(str::trim).collect();
    if parts.len() < 4 {
        return "ERROR Invalid instrument payload\n".to_string();
    }
    let ticker = parts[0];
    let description = parts[1];
    let industry = parts[2];
    let initial_price: f64 = match parts[3].parse() {
        Ok(price) => price,
        Err(_) => return "ERROR Invalid initial price\n".to_string(),
    };
    if ticker.is_empty() || initial_price <= 0.0 {
        return "ERROR Invalid ticker\n".to_string();
    }
    match service.add_instrument(ticker, description, industry, initial_price) {
        Ok(symbol_id) => format!("OK {symbol_id}\n"),
        Err(_) => "ERROR Invalid ticker\n".to_string(),
    }
}

/// `REMOVE_INSTRUMENT <symbol_id>`
fn remove_instrument(service: &InstrumentManager, rest: &str) -> String {
    match parse_symbol_id(rest) {
        Some(symbol_id) if service.remove_instrument(symbol_id) => "OK\n".to_string(),
        _ => "ERROR Instrument not found\n".to_string(),
    }
}

/// `LIST_INSTRUMENTS`
fn list_instruments(service: &InstrumentManager) -> String {
    let instruments = service.list_instruments();
    let mut out = format!("INSTRUMENTS {}\n", instruments.len());
    for instrument in &instruments {
        let _ = writeln!(
            out,
            "{}|{}|{}|{}|{}",
            instrument.symbol_id,
            instrument.ticker,
            instrument.description,
            instrument.industry,
            instrument.initial_price
        );
    }
    out.push_str("END\n");
    out
}

/// `ADD <symbol_id> <B|S> <L|M> <price> <qty>`
///
/// Side and type parsing is deliberately permissive, matching the existing
/// gateway: a leading `B` means buy, anything else sell; a leading `L`
/// means limit, anything else market. The price field is present on the
/// wire for market orders but replaced with the side's sentinel.
fn add_order(service: &InstrumentManager, next_order_id: &AtomicU64, rest: &str) -> String {
    let mut tokens = rest.split_whitespace();
    let Some(symbol_id) = tokens.next().and_then(|t| t.parse::<SymbolId>().ok()) else {
        return "ERROR Instrument not found\n".to_string();
    };
    let side = match tokens.next().and_then(|t| t.chars().next()) {
        Some('B') => Side::Buy,
        Some(_) => Side::Sell,
        None => return "ERROR Unknown command\n".to_string(),
    };
    let kind = match tokens.next().and_then(|t| t.chars().next()) {
        Some('L') => OrderType::Limit,
        Some(_) => OrderType::Market,
        None => return "ERROR Unknown command\n".to_string(),
    };
    let price: Price = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .unwrap_or_default();
    let quantity: Quantity = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .unwrap_or_default();

    if !service.has_instrument(symbol_id) {
        return "ERROR Instrument not found\n".to_string();
    }
    if kind == OrderType::Limit && price <= 0 {
        return "ERROR Invalid price for LIMIT order (must be > 0)\n".to_string();
    }
    if quantity <= 0 {
        return "ERROR Invalid quantity (must be > 0)\n".to_string();
    }

    let price = match kind {
        OrderType::Limit => price,
        OrderType::Market => market_sentinel(side),
    };
    let order_id = next_order_id.fetch_add(1, Ordering::Relaxed);
    let order = Order {
        id: order_id,
        symbol_id,
        side,
        kind,
        price,
        quantity,
        timestamp: monotonic_nanos(),
    };

    match service.submit_order(order) {
        Ok(()) => format!("OK {order_id}\n"),
        Err(_) => "ERROR Failed to submit order (queue full or validation failed)\n".to_string(),
    }
}

/// `CANCEL <symbol_id> <order_id>`
fn cancel_order(service: &InstrumentManager, rest: &str) -> String {
    let mut tokens = rest.split_whitespace();
    let symbol_id = tokens.next().and_then(|t| t.parse::<SymbolId>().ok());
    let order_id = tokens.next().and_then(|t| t.parse::<u64>().ok());
    match (symbol_id, order_id) {
        (Some(symbol_id), Some(order_id)) if service.cancel_order(symbol_id, order_id) => {
            "OK\n".to_string()
        }
        _ => "NOTFOUND\n".to_string(),
    }
}

/// `SNAPSHOT <symbol_id>`
fn snapshot(service: &InstrumentManager, rest: &str) -> String {
    let Some(symbol_id) = parse_symbol_id(rest) else {
        return "ERROR Instrument not found\n".to_string();
    };
    if !service.has_instrument(symbol_id) {
        return "ERROR Instrument not found\n".to_string();
    }

    let bids = service.snapshot_bids(symbol_id, SNAPSHOT_DEPTH);
    let asks = service.snapshot_asks(symbol_id, SNAPSHOT_DEPTH);

    let mut out = format!("SNAPSHOT {symbol_id}\n");
    let _ = writeln!(out, "BIDS {}", bids.len());
    for level in &bids {
        let _ = writeln!(
            out,
            "{} {} {}",
            level.price, level.total_quantity, level.order_count
        );
    }
    let _ = writeln!(out, "ASKS {}", asks.len());
    for level in &asks {
        let _ = writeln!(
            out,
            "{} {} {}",
            level.price, level.total_quantity, level.order_count
        );
    }
    out.push_str("END\n");
    out
}

fn parse_symbol_id(rest: &str) -> Option<SymbolId> {
    rest.split_whitespace().next()?.parse().ok()
}
