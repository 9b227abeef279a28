use nc_domain::config::sync::{HUB_SNAPSHOT_FORMAT, SCHEMA_VERSION};
use serde::{Deserialize, Serialize};

/// One exported memory record. Kind, tier, confidence, and source
/// metadata survive the round trip; everything else is best-effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubSnapshotEntry {
    pub record_id: String,
    pub key: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubSnapshotMeta {
    pub schema_version: u32,
    pub format: String,
    pub source_node: String,
    pub created_at: i64,
    pub entry_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubSnapshot {
    pub meta: HubSnapshotMeta,
    pub entries: Vec<HubSnapshotEntry>,
}

pub fn export_snapshot(source_node: &str, created_at: i64, entries: Vec<HubSnapshotEntry>) -> HubSnapshot {
    HubSnapshot {
        meta: HubSnapshotMeta {
            schema_version: SCHEMA_VERSION,
            format: HUB_SNAPSHOT_FORMAT.into(),
            source_node: source_node.into(),
            created_at,
            entry_count: entries.len(),
        },
        entries,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub imported: usize,
    pub skipped: usize,
    pub schema_version: u32,
    #[serde(skip)]
    pub entries: Vec<HubSnapshotEntry>,
}

/// Import rules: absent or mismatched `format` magic → reject outright
/// (`imported = 0, skipped = 0`); `schema_version != 1` → reject,
/// reporting the version as received; otherwise each entry is parsed
/// independently — malformed ones count toward `skipped`, the rest
/// toward `imported`.
pub fn import_snapshot(raw: &serde_json::Value) -> ImportOutcome {
    let meta = raw.get("meta");
    let format = meta.and_then(|m| m.get("format")).and_then(|f| f.as_str());
    let schema_version = meta
        .and_then(|m| m.get("schema_version"))
        .and_then(|v| v.as_u64())
        .map(|v| v as u32)
        .unwrap_or(0);

    if format != Some(HUB_SNAPSHOT_FORMAT) {
        return ImportOutcome {
            imported: 0,
            skipped: 0,
            schema_version,
            entries: Vec::new(),
        };
    }
    if schema_version != SCHEMA_VERSION {
        return ImportOutcome {
            imported: 0,
            skipped: 0,
            schema_version,
            entries: Vec::new(),
        };
    }

    let mut imported = Vec::new();
    let mut skipped = 0usize;
    for raw_entry in raw.get("entries").and_then(|e| e.as_array()).into_iter().flatten() {
        match serde_json::from_value::<HubSnapshotEntry>(raw_entry.clone()) {
            Ok(entry) => imported.push(entry),
            Err(_) => skipped += 1,
        }
    }

    ImportOutcome {
        imported: imported.len(),
        skipped,
        schema_version,
        entries: imported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry(id: &str) -> HubSnapshotEntry {
        HubSnapshotEntry {
            record_id: id.into(),
            key: format!("key-{id}"),
            content: "hello".into(),
            category: Some("notes".into()),
            kind: Some("semantic".into()),
            tier: Some("standard".into()),
            confidence: Some(0.8),
            source: Some("huginn".into()),
        }
    }

    #[test]
    fn round_trip_preserves_entries() {
        let snapshot = export_snapshot("huginn", 1000, vec![sample_entry("a"), sample_entry("b")]);
        let raw = serde_json::to_value(&snapshot).unwrap();
        let outcome = import_snapshot(&raw);
        assert_eq!(outcome.imported, 2);
        assert_eq!(outcome.skipped, 0);
        assert_eq!(outcome.entries, snapshot.entries);
    }

    #[test]
    fn mismatched_format_magic_rejects_everything() {
        let raw = serde_json::json!({
            "meta": {"schema_version": 1, "format": "wrong", "source_node": "huginn", "created_at": 0, "entry_count": 1},
            "entries": [{"record_id": "a", "key": "k", "content": "c"}],
        });
        let outcome = import_snapshot(&raw);
        assert_eq!(outcome.imported, 0);
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn absent_format_rejects() {
        let raw = serde_json::json!({"meta": {"schema_version": 1}, "entries": []});
        let outcome = import_snapshot(&raw);
        assert_eq!(outcome.imported, 0);
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn unsupported_schema_version_rejects_and_reports_version() {
        let raw = serde_json::json!({
            "meta": {"schema_version": 99, "format": HUB_SNAPSHOT_FORMAT, "source_node": "huginn", "created_at": 0, "entry_count": 0},
            "entries": [],
        });
        let outcome = import_snapshot(&raw);
        assert_eq!(outcome.imported, 0);
        assert_eq!(outcome.skipped, 0);
        assert_eq!(outcome.schema_version, 99);
    }

    #[test]
    fn malformed_entries_counted_as_skipped() {
        let raw = serde_json::json!({
            "meta": {"schema_version": 1, "format": HUB_SNAPSHOT_FORMAT, "source_node": "huginn", "created_at": 0, "entry_count": 2},
            "entries": [
                {"record_id": "a", "key": "k", "content": "c"},
                {"record_id": "b"},
            ],
        });
        let outcome = import_snapshot(&raw);
        assert_eq!(outcome.imported, 1);
        assert_eq!(outcome.skipped, 1);
    }
}
