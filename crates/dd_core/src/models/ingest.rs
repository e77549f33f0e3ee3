//! Catalog-boundary stat adapter.
//!
//! Upstream catalog records carry the same stat under several spellings
//! (`BA`/`AVG`, `SO`/`K`, `YR`/`Year`, mixed case, numeric strings). This
//! adapter resolves the aliases exactly once, at ingestion, into the typed
//! profiles; the core reads canonical fields only.

use serde_json::{Map, Value};

use super::player::{BattingProfile, PitchingProfile, PlayerId};

fn raw(record: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = record
        .get(key)
        .or_else(|| record.get(&key.to_uppercase()))
        .or_else(|| record.get(&key.to_lowercase()))?;
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn stat(record: &Map<String, Value>, key: &str) -> f64 {
    raw(record, key).unwrap_or(0.0)
}

fn alias(record: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| raw(record, k))
}

fn season_year(record: &Map<String, Value>) -> Option<u16> {
    alias(record, &["YR", "Year"]).map(|y| y as u16)
}

/// Strikeouts appear as `SO` in some source tables and `K` in others; a zero
/// under one key defers to the other.
fn strikeouts(record: &Map<String, Value>) -> u32 {
    let so = stat(record, "SO");
    if so > 0.0 {
        so as u32
    } else {
        stat(record, "K") as u32
    }
}

pub fn batting_from_record(
    player_id: PlayerId,
    name: &str,
    record: &Map<String, Value>,
) -> BattingProfile {
    BattingProfile {
        player_id,
        name: name.to_string(),
        year: season_year(record),
        ab: stat(record, "AB") as u32,
        h: stat(record, "H") as u32,
        doubles: stat(record, "2B") as u32,
        triples: stat(record, "3B") as u32,
        hr: stat(record, "HR") as u32,
        bb: stat(record, "BB") as u32,
        so: strikeouts(record),
        avg: alias(record, &["BA", "AVG"]),
    }
}

pub fn pitching_from_record(
    player_id: PlayerId,
    name: &str,
    record: &Map<String, Value>,
) -> PitchingProfile {
    PitchingProfile {
        player_id,
        name: name.to_string(),
        year: season_year(record),
        ip: stat(record, "IP"),
        h: stat(record, "H") as u32,
        bb: stat(record, "BB") as u32,
        so: strikeouts(record),
        hr: stat(record, "HR") as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test records are objects"),
        }
    }

    #[test]
    fn aliases_and_case_resolved() {
        let rec = record(json!({
            "ab": 520, "h": "180", "2B": 35, "3b": 4, "HR": 22,
            "BB": 60, "K": 95, "AVG": 0.346, "Year": 1921
        }));
        let profile = batting_from_record(7, "Alias Hitter", &rec);
        assert_eq!(profile.ab, 520);
        assert_eq!(profile.h, 180, "numeric strings are parsed");
        assert_eq!(profile.doubles, 35);
        assert_eq!(profile.triples, 4);
        assert_eq!(profile.so, 95, "K stands in for SO");
        assert_eq!(profile.avg, Some(0.346));
        assert_eq!(profile.year, Some(1921));
    }

    #[test]
    fn ba_preferred_over_avg_and_missing_stays_none() {
        let rec = record(json!({"BA": 0.301, "AVG": 0.250, "AB": 10, "H": 3}));
        assert_eq!(batting_from_record(1, "x", &rec).avg, Some(0.301));

        let rec = record(json!({"AB": 10, "H": 3}));
        assert_eq!(batting_from_record(1, "x", &rec).avg, None);
    }

    #[test]
    fn pitching_record_parses_ip_as_float() {
        let rec = record(json!({"IP": 212.1, "H": 190, "BB": 44, "SO": 201, "HR": 18, "YR": 1968}));
        let profile = pitching_from_record(3, "Ace", &rec);
        assert!((profile.ip - 212.1).abs() < 1e-12);
        assert_eq!(profile.so, 201);
        assert_eq!(profile.year, Some(1968));
    }

    #[test]
    fn missing_stats_default_to_zero() {
        let rec = record(json!({"NAME": "Empty"}));
        let profile = batting_from_record(1, "Empty", &rec);
        assert_eq!(profile.ab, 0);
        assert_eq!(profile.h, 0);
        assert_eq!(profile.year, None);
    }
}
