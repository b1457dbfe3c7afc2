//! Plain-text rendering of the engine feed.

use std::io::{self, Write};

use crossbeam::channel::Receiver;

use sentinel_core::snapshot::Snapshot;
use sentinel_engine::FeedUpdate;

/// Writes every update to `out` until all senders are gone.
pub fn drain<W: Write>(feed: Receiver<FeedUpdate>, mut out: W) -> io::Result<()> {
    for update in feed.iter() {
        match update {
            FeedUpdate::LogLine(line) => writeln!(out, "{line}")?,
            FeedUpdate::Snapshot(snapshot) => writeln!(out, "{}", summary(&snapshot))?,
        }
    }
    out.flush()
}

/// One status line per snapshot: totals, current rate, protocol mix and threat.
pub fn summary(snapshot: &Snapshot) -> String {
    let mix = snapshot
        .counters()
        .distribution()
        .iter()
        .map(|(protocol, share)| format!("{protocol} {:.0}%", share * 100.0))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "-- #{:<4} packets {:<6} bytes {:<9} rate {:>3}/s peak {:>3} | {} | {}",
        snapshot.sequence(),
        snapshot.total_packets(),
        snapshot.total_bytes(),
        snapshot.packets_per_interval(),
        snapshot.window().peak(),
        mix,
        snapshot.threat(),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Local;
    use crossbeam::channel;
    use sentinel_core::events::{PacketEvent, Protocol};
    use sentinel_core::store::AggregationStore;
    use sentinel_core::threat::ThreatLabel;

    use super::*;

    #[test]
    fn summary_shows_mix_and_label() {
        let store = Arc::new(AggregationStore::new(60));
        store.begin_session().unwrap();
        for protocol in [Protocol::Tcp, Protocol::Tcp, Protocol::Udp, Protocol::Https] {
            store
                .ingest(PacketEvent::new(Local::now(), protocol, "10.0.0.3", "204.79.197.200 (Bing)", 100))
                .unwrap();
        }
        store.rotate_window().unwrap();
        let snapshot = store.snapshot().unwrap().with_threat(ThreatLabel::Secure);

        let line = summary(&snapshot);
        assert!(line.contains("TCP 50%"));
        assert!(line.contains("UDP 25%"));
        assert!(line.contains("ICMP 0%"));
        assert!(line.contains("rate   4/s"));
        assert!(line.ends_with("SECURE"));
    }

    #[test]
    fn drain_writes_updates_in_order_until_closed() {
        let store = AggregationStore::new(4);
        store.begin_session().unwrap();
        store.rotate_window().unwrap();
        let snapshot = store.snapshot().unwrap().with_threat(ThreatLabel::Analyzing);

        let (tx, rx) = channel::unbounded();
        tx.send(FeedUpdate::LogLine("first".into())).unwrap();
        tx.send(FeedUpdate::Snapshot(snapshot)).unwrap();
        tx.send(FeedUpdate::LogLine("last".into())).unwrap();
        drop(tx);

        let mut out = Vec::new();
        drain(rx, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "first");
        assert!(lines[1].starts_with("-- #1"));
        assert!(lines[1].ends_with("ANALYZING"));
        assert_eq!(lines[2], "last");
    }
}
