//! Prometheus text for the latest published snapshot
//!
//! Rendered at scrape time so that symbols dropping out of the rankings
//! disappear instead of lingering as stale labelled series.

use crate::poller::MarketSnapshot;
use std::fmt::Write;

struct Family {
    name: &'static str,
    help: &'static str,
}

const SPREAD_VALUE: Family = Family {
    name: "spread_value",
    help: "Bid-ask spread of the symbol",
};
const SPREAD_DELTA: Family = Family {
    name: "spread_delta",
    help: "Absolute delta from the previous spread value with sign label",
};
const NOTIONAL_ASKS: Family = Family {
    name: "notional_asks_total",
    help: "Notional value of the leading ask levels",
};
const NOTIONAL_BIDS: Family = Family {
    name: "notional_bids_total",
    help: "Notional value of the leading bid levels",
};

fn header(out: &mut String, family: &Family) {
    let _ = writeln!(out, "# HELP {} {}", family.name, family.help);
    let _ = writeln!(out, "# TYPE {} gauge", family.name);
}

/// Render the snapshot gauges; empty when nothing is published
pub fn render_snapshot(snapshot: Option<&MarketSnapshot>) -> String {
    let mut out = String::new();
    let Some(snapshot) = snapshot else {
        return out;
    };

    if !snapshot.spreads.is_empty() {
        header(&mut out, &SPREAD_VALUE);
        for metric in &snapshot.spreads {
            let _ = writeln!(
                out,
                "{}{{symbol=\"{}\"}} {}",
                SPREAD_VALUE.name,
                metric.symbol(),
                metric.snapshot.spread.normalize()
            );
        }

        header(&mut out, &SPREAD_DELTA);
        for metric in &snapshot.spreads {
            let _ = writeln!(
                out,
                "{}{{symbol=\"{}\",sign=\"{}\"}} {}",
                SPREAD_DELTA.name,
                metric.symbol(),
                metric.sign.label(),
                metric.delta.abs().normalize()
            );
        }
    }

    if !snapshot.notional_values.is_empty() {
        header(&mut out, &NOTIONAL_ASKS);
        for value in &snapshot.notional_values {
            let _ = writeln!(
                out,
                "{}{{symbol=\"{}\"}} {}",
                NOTIONAL_ASKS.name,
                value.symbol,
                value.asks_total.normalize()
            );
        }

        header(&mut out, &NOTIONAL_BIDS);
        for value in &snapshot.notional_values {
            let _ = writeln!(
                out,
                "{}{{symbol=\"{}\"}} {}",
                NOTIONAL_BIDS.name,
                value.symbol,
                value.bids_total.normalize()
            );
        }
    }

    out
}
