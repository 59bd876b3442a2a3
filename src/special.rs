use crate::values::{FrequencyType, InternedCap, Segment, StringValue};

const EARTH_RADIUS: f64 = 6372.8;
const TO_RAD: f64 = 3.1415926536 / 180.0;

/// Timestamps in events are microseconds; `now` is seconds.
const MICROS_PER_SECOND: i64 = 1_000_000;

/// True when the requested value still fits under every matching cap. A cap
/// matches on (object id, namespace, type); when no cap matches, the
/// request passes.
pub(crate) fn within_frequency_caps(
    caps: &[InternedCap],
    cap_type: FrequencyType,
    id: u32,
    namespace: StringValue,
    value: i64,
    length: i64,
    now: i64,
) -> bool {
    for cap in caps {
        if cap.id == id && cap.namespace.str_id == namespace.str_id && cap.cap_type == cap_type {
            if length <= 0 {
                return value > cap.value;
            }
            let Some(timestamp) = cap.timestamp else {
                return true;
            };
            if now - timestamp / MICROS_PER_SECOND > length {
                return true;
            }
            return value > cap.value;
        }
    }
    true
}

/// The segment list is sorted ascending by id; the scan stops at the first
/// id that is not smaller than the target.
pub(crate) fn segment_within(
    segment_id: i64,
    after_seconds: i64,
    segments: &[Segment],
    now: i64,
) -> bool {
    for segment in segments {
        if segment.id < segment_id {
            continue;
        }
        if segment.id == segment_id {
            return now - after_seconds <= segment.timestamp / MICROS_PER_SECOND;
        }
        return false;
    }
    false
}

pub(crate) fn segment_before(
    segment_id: i64,
    before_seconds: i64,
    segments: &[Segment],
    now: i64,
) -> bool {
    for segment in segments {
        if segment.id < segment_id {
            continue;
        }
        if segment.id == segment_id {
            return now - before_seconds > segment.timestamp / MICROS_PER_SECOND;
        }
        return false;
    }
    false
}

/// Great-circle distance via the haversine approximation.
pub(crate) fn geo_within_radius(lat1: f64, lon1: f64, lat2: f64, lon2: f64, distance: f64) -> bool {
    let dlon = (lon1 - lon2) * TO_RAD;
    let lat1 = lat1 * TO_RAD;
    let lat2 = lat2 * TO_RAD;

    let dz = lat1.sin() - lat2.sin();
    let dx = dlon.cos() * lat1.cos() - lat2.cos();
    let dy = dlon.sin() * lat1.cos();

    ((dx * dx + dy * dy + dz * dz).sqrt() / 2.0).asin() * 2.0 * EARTH_RADIUS <= distance
}

pub(crate) fn contains(value: &str, pattern: &str) -> bool {
    value.contains(pattern)
}

pub(crate) fn starts_with(value: &str, pattern: &str) -> bool {
    value.starts_with(pattern)
}

pub(crate) fn ends_with(value: &str, pattern: &str) -> bool {
    value.ends_with(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::VariableId, strings::StringId};

    const NOW: i64 = 1_600_000_060;
    const CAP_TIMESTAMP: i64 = 1_600_000_000_000_000;

    fn namespace(str_id: usize) -> StringValue {
        StringValue {
            var: VariableId(0),
            str_id: StringId(str_id),
        }
    }

    fn campaign_cap(value: i64, timestamp: Option<i64>) -> InternedCap {
        InternedCap {
            cap_type: FrequencyType::Campaign,
            id: 30,
            namespace: namespace(0),
            value,
            timestamp,
        }
    }

    #[test]
    fn capped_when_the_requested_value_does_not_exceed_the_cap() {
        let caps = [campaign_cap(3, Some(CAP_TIMESTAMP))];

        assert!(!within_frequency_caps(
            &caps,
            FrequencyType::Campaign,
            30,
            namespace(0),
            3,
            0,
            NOW
        ));
        assert!(within_frequency_caps(
            &caps,
            FrequencyType::Campaign,
            30,
            namespace(0),
            4,
            0,
            NOW
        ));
    }

    #[test]
    fn a_cap_without_a_timestamp_passes_when_a_length_is_set() {
        let caps = [campaign_cap(3, None)];

        assert!(within_frequency_caps(
            &caps,
            FrequencyType::Campaign,
            30,
            namespace(0),
            1,
            3600,
            NOW
        ));
    }

    #[test]
    fn an_expired_cap_passes() {
        let caps = [campaign_cap(3, Some(CAP_TIMESTAMP))];

        // The cap is 60 seconds old; a 30 second window has expired.
        assert!(within_frequency_caps(
            &caps,
            FrequencyType::Campaign,
            30,
            namespace(0),
            1,
            30,
            NOW
        ));
    }

    #[test]
    fn a_live_cap_applies_its_value() {
        let caps = [campaign_cap(3, Some(CAP_TIMESTAMP))];

        assert!(!within_frequency_caps(
            &caps,
            FrequencyType::Campaign,
            30,
            namespace(0),
            3,
            3600,
            NOW
        ));
        assert!(within_frequency_caps(
            &caps,
            FrequencyType::Campaign,
            30,
            namespace(0),
            4,
            3600,
            NOW
        ));
    }

    #[test]
    fn an_event_without_a_matching_cap_passes() {
        let caps = [campaign_cap(3, Some(CAP_TIMESTAMP))];

        assert!(within_frequency_caps(
            &caps,
            FrequencyType::Flight,
            10,
            namespace(0),
            3,
            0,
            NOW
        ));
        assert!(within_frequency_caps(
            &caps,
            FrequencyType::Campaign,
            30,
            namespace(1),
            3,
            0,
            NOW
        ));
    }

    #[test]
    fn segment_within_checks_the_entry_age() {
        let segments = [Segment::new(1, CAP_TIMESTAMP), Segment::new(2, 0)];

        // Entered 60 seconds ago.
        assert!(segment_within(1, 120, &segments, NOW));
        assert!(!segment_within(1, 30, &segments, NOW));
    }

    #[test]
    fn segment_before_is_the_complement_on_the_age() {
        let segments = [Segment::new(1, CAP_TIMESTAMP)];

        assert!(segment_before(1, 30, &segments, NOW));
        assert!(!segment_before(1, 120, &segments, NOW));
    }

    #[test]
    fn a_missing_segment_never_matches() {
        let segments = [Segment::new(1, CAP_TIMESTAMP), Segment::new(5, CAP_TIMESTAMP)];

        assert!(!segment_within(3, 3600, &segments, NOW));
        assert!(!segment_before(3, 3600, &segments, NOW));
        assert!(!segment_within(9, 3600, &segments, NOW));
    }

    #[test]
    fn points_inside_the_radius_match() {
        // Downtown Montreal, ~2 km apart.
        assert!(geo_within_radius(
            45.5017, -73.5673, 45.5088, -73.5878, 10.0
        ));
        // Montreal to New York City, ~530 km.
        assert!(!geo_within_radius(
            45.5017, -73.5673, 40.7128, -74.0060, 10.0
        ));
    }

    #[test]
    fn string_predicates_operate_on_the_raw_text() {
        assert!(contains("deal-123", "l-1"));
        assert!(!contains("deal-123", "l-9"));
        assert!(starts_with("deal-123", "deal"));
        assert!(!starts_with("deal-123", "123"));
        assert!(ends_with("deal-123", "123"));
        assert!(!ends_with("deal-123", "deal"));
    }
}
