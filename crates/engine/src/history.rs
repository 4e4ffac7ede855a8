//! Bounded, newest-first record of successful calculations.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{HistoryEntry, MAX_HISTORY_ENTRIES};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first `MAX_HISTORY_ENTRIES`, assuming newest-first order.
    pub fn from_entries(mut entries: Vec<HistoryEntry>) -> Self {
        entries.truncate(MAX_HISTORY_ENTRIES);
        Self { entries }
    }

    /// Decode a persisted JSON array.
    ///
    /// Non-array documents yield an empty log and elements that do not decode
    /// as entries are skipped. Only text that is not JSON at all is an error.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let Value::Array(items) = serde_json::from_str::<Value>(raw)? else {
            return Ok(Self::new());
        };
        let entries = items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<HistoryEntry>(item).ok())
            .take(MAX_HISTORY_ENTRIES)
            .collect();
        Ok(Self { entries })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries)
    }

    /// Prepend `entry`, evicting the oldest once the cap is reached.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(MAX_HISTORY_ENTRIES);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: i64) -> HistoryEntry {
        HistoryEntry::new(format!("{n} + 0"), n.to_string(), n)
    }

    #[test]
    fn records_newest_first_and_evicts_oldest() {
        let mut log = HistoryLog::new();
        for n in 0..25 {
            log.record(entry(n));
        }
        assert_eq!(log.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(log.latest().map(|e| e.timestamp), Some(24));
        assert_eq!(log.entries().last().map(|e| e.timestamp), Some(5));
    }

    #[test]
    fn json_round_trip_keeps_order() {
        let mut log = HistoryLog::new();
        log.record(entry(1));
        log.record(entry(2));
        let json = log.to_json().expect("encode");
        let decoded = HistoryLog::from_json(&json).expect("decode");
        assert_eq!(decoded, log);
    }

    #[test]
    fn oversized_documents_are_truncated() {
        let entries: Vec<_> = (0..30).map(entry).collect();
        let raw = serde_json::to_string(&entries).expect("encode");
        let log = HistoryLog::from_json(&raw).expect("decode");
        assert_eq!(log.len(), MAX_HISTORY_ENTRIES);
        assert_eq!(log.latest().map(|e| e.timestamp), Some(0));
    }

    #[test]
    fn malformed_elements_are_skipped() {
        let good = serde_json::to_value(entry(7)).expect("encode");
        let raw = serde_json::json!([{"expression": 1}, good, "nope"]).to_string();
        let log = HistoryLog::from_json(&raw).expect("decode");
        assert_eq!(log.len(), 1);
        assert_eq!(log.latest().map(|e| e.result.as_str()), Some("7"));
    }

    #[test]
    fn non_array_documents_yield_empty_log() {
        assert!(HistoryLog::from_json("{\"a\":1}").expect("decode").is_empty());
        assert!(HistoryLog::from_json("not json").is_err());
    }
}
