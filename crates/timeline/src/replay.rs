use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::event::{EventKind, Severity, TimelineEvent};

/// Filter applied while replaying a timeline.
#[derive(Debug, Clone, Default)]
pub struct ReplayFilter {
    pub kind: Option<EventKind>,
    pub min_severity: Option<Severity>,
    pub session_id: Option<String>,
    /// Inclusive `[start, end]` nanosecond range.
    pub time_range: Option<(i128, i128)>,
}

impl ReplayFilter {
    fn matches(&self, event: &TimelineEvent) -> bool {
        if let Some(kind) = self.kind {
            if event.kind != kind {
                return false;
            }
        }
        if let Some(min) = self.min_severity {
            if event.severity < min {
                return false;
            }
        }
        if let Some(sid) = &self.session_id {
            if event.session_id.as_deref() != Some(sid.as_str()) {
                return false;
            }
        }
        if let Some((start, end)) = self.time_range {
            if event.ts < start || event.ts > end {
                return false;
            }
        }
        true
    }
}

/// Aggregated view over a replayed session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplaySessionSummary {
    pub total_events: u64,
    pub by_kind: HashMap<String, u64>,
    pub by_severity: HashMap<String, u64>,
    pub earliest_ts: Option<i128>,
    pub latest_ts: Option<i128>,
}

impl ReplaySessionSummary {
    fn record(&mut self, event: &TimelineEvent) {
        self.total_events += 1;
        *self.by_kind.entry(event.kind.as_str().to_string()).or_insert(0) += 1;
        *self
            .by_severity
            .entry(event.severity.as_str().to_string())
            .or_insert(0) += 1;
        self.earliest_ts = Some(self.earliest_ts.map_or(event.ts, |e| e.min(event.ts)));
        self.latest_ts = Some(self.latest_ts.map_or(event.ts, |l| l.max(event.ts)));
    }

    /// Duration spanned by the summarized events, in nanoseconds.
    pub fn duration_ns(&self) -> Option<i128> {
        match (self.earliest_ts, self.latest_ts) {
            (Some(e), Some(l)) => Some(l - e),
            _ => None,
        }
    }
}

/// Streaming reader over a timeline JSONL file.
///
/// Lines are parsed by positional substring extraction rather than a
/// generic JSON parser, keeping per-line cost bounded for large scans.
pub struct ReplayReader {
    buffer_bytes: usize,
}

impl ReplayReader {
    pub fn new(scan_buffer_bytes: usize) -> Self {
        Self {
            buffer_bytes: scan_buffer_bytes,
        }
    }

    /// Scan `path`, parsing each line and yielding the ones matching
    /// `filter`. Malformed or non-conforming lines are silently skipped.
    pub fn scan(
        &self,
        path: &Path,
        filter: &ReplayFilter,
    ) -> nc_domain::Result<Vec<TimelineEvent>> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(self.buffer_bytes, file);
        let mut out = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if let Some(event) = parse_event_line(&line) {
                if filter.matches(&event) {
                    out.push(event);
                }
            }
        }
        Ok(out)
    }

    /// Scan and summarize in one pass.
    pub fn summarize(
        &self,
        path: &Path,
        filter: &ReplayFilter,
    ) -> nc_domain::Result<ReplaySessionSummary> {
        let mut summary = ReplaySessionSummary::default();
        for event in self.scan(path, filter)? {
            summary.record(&event);
        }
        Ok(summary)
    }
}

/// Parse a single timeline JSONL line using positional substring
/// extraction. Returns `None` when the line is too short, doesn't start
/// with `{`, or is missing a required field (`id`, `ts`, `kind`,
/// `severity`, `name`).
pub fn parse_event_line(line: &str) -> Option<TimelineEvent> {
    let line = line.trim_end();
    if line.len() < 2 || !line.starts_with('{') {
        return None;
    }

    let id = extract_string(line, "id")?;
    let ts = extract_i128(line, "ts")?;
    let kind = EventKind::parse(&extract_string(line, "kind")?)?;
    let severity = Severity::parse(&extract_string(line, "severity")?)?;
    let name = extract_string(line, "name")?;

    Some(TimelineEvent {
        id,
        ts,
        kind,
        severity,
        name,
        session_id: extract_string(line, "session_id"),
        task_id: extract_string(line, "task_id"),
        span_id: extract_string(line, "span_id"),
        parent_span_id: extract_string(line, "parent_span_id"),
        duration_ns: extract_u64(line, "duration_ns"),
        message: extract_string(line, "message"),
        component: extract_string(line, "component"),
    })
}

fn field_start(line: &str, key: &str) -> Option<usize> {
    let pat = format!("\"{key}\":");
    line.find(&pat).map(|i| i + pat.len())
}

fn extract_string(line: &str, key: &str) -> Option<String> {
    let start = field_start(line, key)?;
    let rest = line[start..].trim_start();
    if !rest.starts_with('"') {
        return None;
    }
    let bytes = rest.as_bytes();
    let mut out = String::new();
    let mut i = 1;
    while i < bytes.len() {
        let c = bytes[i] as char;
        if c == '\\' && i + 1 < bytes.len() {
            let escaped = bytes[i + 1] as char;
            out.push(match escaped {
                'n' => '\n',
                't' => '\t',
                '"' => '"',
                '\\' => '\\',
                other => other,
            });
            i += 2;
            continue;
        }
        if c == '"' {
            return Some(out);
        }
        out.push(c);
        i += 1;
    }
    None
}

fn extract_i128(line: &str, key: &str) -> Option<i128> {
    let start = field_start(line, key)?;
    let rest = line[start..].trim_start();
    let end = rest.find(|c: char| c == ',' || c == '}').unwrap_or(rest.len());
    rest[..end].trim().parse().ok()
}

fn extract_u64(line: &str, key: &str) -> Option<u64> {
    let start = field_start(line, key)?;
    let rest = line[start..].trim_start();
    let end = rest.find(|c: char| c == ',' || c == '}').unwrap_or(rest.len());
    rest[..end].trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_line() -> String {
        let event = TimelineEvent {
            id: "e1".into(),
            ts: 1_700_000_000_000_000_000,
            kind: EventKind::Tool,
            severity: Severity::Info,
            name: "tool.retried".into(),
            session_id: Some("s1".into()),
            task_id: None,
            span_id: None,
            parent_span_id: None,
            duration_ns: Some(42),
            message: Some("attempt 2".into()),
            component: None,
        };
        serde_json::to_string(&event).unwrap()
    }

    #[test]
    fn parses_a_well_formed_line() {
        let line = sample_line();
        let event = parse_event_line(&line).expect("should parse");
        assert_eq!(event.id, "e1");
        assert_eq!(event.ts, 1_700_000_000_000_000_000);
        assert_eq!(event.kind, EventKind::Tool);
        assert_eq!(event.severity, Severity::Info);
        assert_eq!(event.name, "tool.retried");
        assert_eq!(event.session_id.as_deref(), Some("s1"));
        assert_eq!(event.duration_ns, Some(42));
    }

    #[test]
    fn rejects_short_lines() {
        assert!(parse_event_line("{").is_none());
        assert!(parse_event_line("").is_none());
    }

    #[test]
    fn rejects_lines_not_starting_with_brace() {
        assert!(parse_event_line("not json at all").is_none());
    }

    #[test]
    fn rejects_lines_missing_required_fields() {
        let line = r#"{"id":"e1","ts":1000,"kind":"system"}"#;
        assert!(parse_event_line(line).is_none());
    }

    #[test]
    fn round_trips_through_format_and_parse() {
        let original = TimelineEvent::new("e2", 500, EventKind::Memory, Severity::Warn, "memory.pruned");
        let line = serde_json::to_string(&original).unwrap();
        let parsed = parse_event_line(&line).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn filter_by_min_severity() {
        let mut filter = ReplayFilter::default();
        filter.min_severity = Some(Severity::Warn);
        let low = TimelineEvent::new("e1", 0, EventKind::System, Severity::Debug, "x");
        let high = TimelineEvent::new("e2", 0, EventKind::System, Severity::Error, "y");
        assert!(!filter.matches(&low));
        assert!(filter.matches(&high));
    }

    #[test]
    fn summary_tracks_counts_and_span() {
        let mut summary = ReplaySessionSummary::default();
        summary.record(&TimelineEvent::new("a", 100, EventKind::Tool, Severity::Info, "x"));
        summary.record(&TimelineEvent::new("b", 300, EventKind::Tool, Severity::Error, "y"));
        assert_eq!(summary.total_events, 2);
        assert_eq!(summary.by_kind["tool"], 2);
        assert_eq!(summary.by_severity["info"], 1);
        assert_eq!(summary.by_severity["error"], 1);
        assert_eq!(summary.duration_ns(), Some(200));
    }
}
