//! Service-to-point conversion
//!
//! The core of the processor: computes arrival and departure delays from
//! the "HHMM" clock values on a service record and assembles the tagged
//! delay point written to storage.

use crate::constants::CLOCK_FORMAT;
use crate::error::{Result, RttError};
use crate::models::{DelayPoint, LocationDetail, Service, Station};
use chrono::offset::LocalResult;
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};

/// Delays computed for one service against a reference date.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDelays {
    /// Whole minutes, truncated toward zero; 0 when arrival data is absent.
    pub arrival_delay: i64,
    /// Whole minutes, truncated toward zero.
    pub departure_delay: i64,
    /// Reference date combined with the real departure clock, local time.
    pub event_time: DateTime<Local>,
    /// JSON field names whose clock value failed to parse.
    pub degraded_fields: Vec<&'static str>,
}

impl ServiceDelays {
    /// True when at least one clock field fell back to the zero value.
    pub fn is_degraded(&self) -> bool {
        !self.degraded_fields.is_empty()
    }
}

/// One degraded service within a converted batch.
#[derive(Debug, Clone, PartialEq)]
pub struct DegradedRecord {
    pub service_uid: String,
    pub fields: Vec<&'static str>,
}

/// All points converted from one station document.
#[derive(Debug, Clone, Default)]
pub struct ConvertedBatch {
    pub points: Vec<DelayPoint>,
    pub degraded: Vec<DegradedRecord>,
}

/// Compute arrival and departure delay for one service.
///
/// Arrival delay is 0 when either arrival field is absent: a service that
/// originates at the searched station has no arrival to be late for.
/// Unparsable clock values fall back to midnight and are recorded in
/// `degraded_fields`, so results stay numeric while the caller can still
/// report the record.
///
/// Clock values carry no date component, so a service crossing local
/// midnight wraps to a large negative delay (23:58 -> 00:02 computes
/// -1436, not 4). Stored history carries the wrapped value, so it is
/// deliberately kept.
pub fn compute_delays(detail: &LocationDetail, reference_date: NaiveDate) -> ServiceDelays {
    let mut degraded_fields = Vec::new();

    let arrival_delay = match (
        detail.gbtt_booked_arrival.as_deref().filter(|v| !v.is_empty()),
        detail.realtime_arrival.as_deref().filter(|v| !v.is_empty()),
    ) {
        (Some(booked), Some(real)) => {
            let booked = parse_clock(booked, "gbttBookedArrival", &mut degraded_fields);
            let real = parse_clock(real, "realtimeArrival", &mut degraded_fields);
            real.signed_duration_since(booked).num_minutes()
        }
        _ => 0,
    };

    let booked_departure = parse_clock(
        &detail.gbtt_booked_departure,
        "gbttBookedDeparture",
        &mut degraded_fields,
    );
    let real_departure = parse_clock(
        &detail.realtime_departure,
        "realtimeDeparture",
        &mut degraded_fields,
    );
    let departure_delay = real_departure
        .signed_duration_since(booked_departure)
        .num_minutes();

    ServiceDelays {
        arrival_delay,
        departure_delay,
        event_time: local_event_time(reference_date, real_departure),
        degraded_fields,
    }
}

/// Assemble a delay point from a service and its computed delays.
///
/// Fails when the service has no origin or destination entry to take a
/// station code from; that is a malformed record and aborts the run.
pub fn build_point(service: &Service, delays: &ServiceDelays) -> Result<DelayPoint> {
    let detail = &service.location_detail;

    let origin = detail.origin.first().ok_or_else(|| RttError::PointConstruction {
        service_uid: service.service_uid.clone(),
        reason: "service has no origin calling point".to_string(),
    })?;
    let destination = detail
        .destination
        .first()
        .ok_or_else(|| RttError::PointConstruction {
            service_uid: service.service_uid.clone(),
            reason: "service has no destination calling point".to_string(),
        })?;

    Ok(DelayPoint {
        timestamp: delays.event_time,
        arrival_delay: delays.arrival_delay,
        departure_delay: delays.departure_delay,
        platform: detail.platform.clone(),
        origin: origin.tiploc.clone(),
        destination: destination.tiploc.clone(),
        operator: service.atoc_code.clone(),
        cancellation_code: detail.cancel_reason_code.clone(),
    })
}

/// Convert every service in a station document against one calendar date.
pub fn convert_station(station: &Station, reference_date: NaiveDate) -> Result<ConvertedBatch> {
    let services = station.services();
    let mut batch = ConvertedBatch {
        points: Vec::with_capacity(services.len()),
        degraded: Vec::new(),
    };

    for service in services {
        let delays = compute_delays(&service.location_detail, reference_date);
        let point = build_point(service, &delays)?;
        if delays.is_degraded() {
            batch.degraded.push(DegradedRecord {
                service_uid: service.service_uid.clone(),
                fields: delays.degraded_fields,
            });
        }
        batch.points.push(point);
    }

    Ok(batch)
}

/// Parse an "HHMM" clock value, falling back to midnight and recording the
/// field name when the value does not parse.
fn parse_clock(value: &str, field: &'static str, degraded: &mut Vec<&'static str>) -> NaiveTime {
    match NaiveTime::parse_from_str(value, CLOCK_FORMAT) {
        Ok(time) => time,
        Err(_) => {
            degraded.push(field);
            NaiveTime::MIN
        }
    }
}

/// Combine the reference date with a clock value in local time.
fn local_event_time(date: NaiveDate, time: NaiveTime) -> DateTime<Local> {
    let naive = date.and_time(time);
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(timestamp) => timestamp,
        // A repeated wall-clock hour resolves to its first occurrence.
        LocalResult::Ambiguous(earliest, _) => earliest,
        // A skipped wall-clock hour maps through UTC.
        LocalResult::None => Local.from_utc_datetime(&naive),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CallPoint;
    use chrono::{NaiveDateTime, Timelike};

    fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 15).unwrap()
    }

    fn detail(
        booked_arrival: Option<&str>,
        real_arrival: Option<&str>,
        booked_departure: &str,
        real_departure: &str,
    ) -> LocationDetail {
        LocationDetail {
            gbtt_booked_arrival: booked_arrival.map(String::from),
            realtime_arrival: real_arrival.map(String::from),
            gbtt_booked_departure: booked_departure.to_string(),
            realtime_departure: real_departure.to_string(),
            platform: "12".to_string(),
            origin: vec![CallPoint {
                tiploc: "MNCRPIC".to_string(),
                description: None,
            }],
            destination: vec![CallPoint {
                tiploc: "SCRBRO".to_string(),
                description: None,
            }],
            cancel_reason_code: None,
        }
    }

    fn service(detail: LocationDetail) -> Service {
        Service {
            location_detail: detail,
            service_uid: "P12345".to_string(),
            atoc_code: "NT".to_string(),
        }
    }

    fn local_naive(delays: &ServiceDelays) -> NaiveDateTime {
        delays.event_time.naive_local()
    }

    #[test]
    fn test_five_minutes_late_round_trip() {
        let delays = compute_delays(
            &detail(Some("0800"), Some("0805"), "0800", "0805"),
            reference_date(),
        );

        assert_eq!(delays.arrival_delay, 5);
        assert_eq!(delays.departure_delay, 5);
        assert_eq!(
            local_naive(&delays),
            reference_date().and_hms_opt(8, 5, 0).unwrap()
        );
        assert!(!delays.is_degraded());
    }

    #[test]
    fn test_missing_arrival_fields_mean_zero_delay() {
        let delays = compute_delays(&detail(None, None, "0800", "0800"), reference_date());
        assert_eq!(delays.arrival_delay, 0);
        assert!(!delays.is_degraded());

        let delays = compute_delays(&detail(Some("0800"), None, "0800", "0800"), reference_date());
        assert_eq!(delays.arrival_delay, 0);
        assert!(!delays.is_degraded());

        let delays = compute_delays(&detail(None, Some("0805"), "0800", "0800"), reference_date());
        assert_eq!(delays.arrival_delay, 0);
        assert!(!delays.is_degraded());
    }

    #[test]
    fn test_empty_arrival_strings_are_treated_as_absent() {
        let delays = compute_delays(&detail(Some(""), Some(""), "0800", "0800"), reference_date());
        assert_eq!(delays.arrival_delay, 0);
        assert!(!delays.is_degraded());
    }

    #[test]
    fn test_early_running_gives_negative_delay() {
        let delays = compute_delays(
            &detail(Some("0810"), Some("0807"), "0812", "0809"),
            reference_date(),
        );
        assert_eq!(delays.arrival_delay, -3);
        assert_eq!(delays.departure_delay, -3);
    }

    #[test]
    fn test_midnight_crossing_wraps_to_large_negative() {
        let delays = compute_delays(
            &detail(Some("2358"), Some("0002"), "2358", "0002"),
            reference_date(),
        );

        assert_eq!(delays.arrival_delay, -1436);
        assert_eq!(delays.departure_delay, -1436);
        // The event still lands on the reference date at the real clock value.
        assert_eq!(
            local_naive(&delays),
            reference_date().and_hms_opt(0, 2, 0).unwrap()
        );
    }

    #[test]
    fn test_unparsable_clock_degrades_to_zero_values() {
        let delays = compute_delays(
            &detail(Some("08:00"), Some("0805"), "garbage", "0805"),
            reference_date(),
        );

        // Booked arrival fell back to midnight, so the delay is measured
        // from 00:00; booked departure did the same.
        assert_eq!(delays.arrival_delay, 485);
        assert_eq!(delays.departure_delay, 485);
        assert!(delays.is_degraded());
        assert_eq!(
            delays.degraded_fields,
            vec!["gbttBookedArrival", "gbttBookedDeparture"]
        );
    }

    #[test]
    fn test_unparsable_real_departure_lands_event_at_midnight() {
        let delays = compute_delays(&detail(None, None, "0800", "25x1"), reference_date());

        assert_eq!(delays.departure_delay, -480);
        assert_eq!(delays.degraded_fields, vec!["realtimeDeparture"]);
        assert_eq!(
            local_naive(&delays),
            reference_date().and_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_empty_departure_fields_are_degraded_not_skipped() {
        let delays = compute_delays(&detail(None, None, "", ""), reference_date());

        assert_eq!(delays.departure_delay, 0);
        assert_eq!(
            delays.degraded_fields,
            vec!["gbttBookedDeparture", "realtimeDeparture"]
        );
    }

    #[test]
    fn test_event_date_always_comes_from_reference() {
        for (year, month, day) in [(2019, 12, 31), (2020, 1, 15), (2021, 6, 1)] {
            let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
            let delays = compute_delays(&detail(None, None, "0800", "2315"), date);
            assert_eq!(local_naive(&delays).date(), date);
            assert_eq!(local_naive(&delays).hour(), 23);
            assert_eq!(local_naive(&delays).minute(), 15);
            assert_eq!(local_naive(&delays).second(), 0);
        }
    }

    #[test]
    fn test_build_point_copies_all_fields() {
        let mut d = detail(Some("0800"), Some("0805"), "0800", "0805");
        d.cancel_reason_code = Some("TW".to_string());
        let service = service(d);
        let delays = compute_delays(&service.location_detail, reference_date());

        let point = build_point(&service, &delays).unwrap();
        assert_eq!(point.arrival_delay, 5);
        assert_eq!(point.departure_delay, 5);
        assert_eq!(point.platform, "12");
        assert_eq!(point.origin, "MNCRPIC");
        assert_eq!(point.destination, "SCRBRO");
        assert_eq!(point.operator, "NT");
        assert_eq!(point.cancellation_code.as_deref(), Some("TW"));
        assert_eq!(point.timestamp, delays.event_time);
    }

    #[test]
    fn test_build_point_takes_first_of_multiple_call_points() {
        let mut d = detail(None, None, "0800", "0800");
        d.origin.push(CallPoint {
            tiploc: "YORK".to_string(),
            description: None,
        });
        let service = service(d);
        let delays = compute_delays(&service.location_detail, reference_date());

        let point = build_point(&service, &delays).unwrap();
        assert_eq!(point.origin, "MNCRPIC");
    }

    #[test]
    fn test_build_point_fails_without_origin_or_destination() {
        let mut d = detail(None, None, "0800", "0800");
        d.origin.clear();
        let service = service(d);
        let delays = compute_delays(&service.location_detail, reference_date());

        match build_point(&service, &delays) {
            Err(RttError::PointConstruction { service_uid, reason }) => {
                assert_eq!(service_uid, "P12345");
                assert!(reason.contains("origin"));
            }
            other => panic!("Expected PointConstruction error, got {:?}", other),
        }

        let mut d = detail(None, None, "0800", "0800");
        d.destination.clear();
        let service = self::service(d);
        let delays = compute_delays(&service.location_detail, reference_date());
        assert!(build_point(&service, &delays).is_err());
    }

    #[test]
    fn test_convert_station_collects_points_and_degraded_records() {
        let station = Station {
            location: None,
            services: Some(vec![
                service(detail(Some("0800"), Some("0805"), "0800", "0805")),
                service(detail(None, None, "bad", "0900")),
            ]),
        };

        let batch = convert_station(&station, reference_date()).unwrap();
        assert_eq!(batch.points.len(), 2);
        assert_eq!(batch.degraded.len(), 1);
        assert_eq!(batch.degraded[0].service_uid, "P12345");
        assert_eq!(batch.degraded[0].fields, vec!["gbttBookedDeparture"]);
    }

    #[test]
    fn test_convert_station_with_no_services() {
        let station = Station {
            location: None,
            services: None,
        };
        let batch = convert_station(&station, reference_date()).unwrap();
        assert!(batch.points.is_empty());
        assert!(batch.degraded.is_empty());
    }
}
