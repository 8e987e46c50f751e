//! Benchmarks for snapshot conversion and line-protocol encoding.

use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rtt_processor::models::{CallPoint, LocationDetail, Service, Station, StationLocation};
use rtt_processor::processor::convert::{compute_delays, convert_station};
use rtt_processor::processor::writer::encode_batch;

/// Build a station document carrying a realistic day of services.
fn synthetic_station(count: usize) -> Station {
    let services = (0..count)
        .map(|i| {
            let hour = 5 + (i / 55) % 18;
            let minute = i % 55;
            Service {
                location_detail: LocationDetail {
                    gbtt_booked_arrival: Some(format!("{:02}{:02}", hour, minute)),
                    realtime_arrival: Some(format!("{:02}{:02}", hour, minute + 3)),
                    gbtt_booked_departure: format!("{:02}{:02}", hour, minute + 1),
                    realtime_departure: format!("{:02}{:02}", hour, minute + 4),
                    platform: format!("{}", (i % 12) + 1),
                    origin: vec![CallPoint {
                        tiploc: "MNCRPIC".to_string(),
                        description: Some("Manchester Piccadilly".to_string()),
                    }],
                    destination: vec![CallPoint {
                        tiploc: "SCRBRO".to_string(),
                        description: Some("Scarborough".to_string()),
                    }],
                    cancel_reason_code: None,
                },
                service_uid: format!("P{:05}", i),
                atoc_code: "NT".to_string(),
            }
        })
        .collect();

    Station {
        location: Some(StationLocation {
            name: Some("Leeds".to_string()),
            crs: Some("LDS".to_string()),
            tiploc: Some("LEEDS".to_string()),
        }),
        services: Some(services),
    }
}

fn bench_compute_delays(c: &mut Criterion) {
    let detail = LocationDetail {
        gbtt_booked_arrival: Some("0800".to_string()),
        realtime_arrival: Some("0805".to_string()),
        gbtt_booked_departure: "0802".to_string(),
        realtime_departure: "0807".to_string(),
        ..Default::default()
    };
    let date = NaiveDate::from_ymd_opt(2020, 1, 15).unwrap();

    c.bench_function("compute_delays", |b| {
        b.iter(|| compute_delays(black_box(&detail), black_box(date)))
    });
}

fn bench_convert_station(c: &mut Criterion) {
    let station = synthetic_station(200);
    let date = NaiveDate::from_ymd_opt(2020, 1, 15).unwrap();

    c.bench_function("convert_station_200_services", |b| {
        b.iter(|| convert_station(black_box(&station), black_box(date)))
    });
}

fn bench_encode_batch(c: &mut Criterion) {
    let station = synthetic_station(200);
    let date = NaiveDate::from_ymd_opt(2020, 1, 15).unwrap();
    let batch = convert_station(&station, date).unwrap();

    c.bench_function("encode_batch_200_points", |b| {
        b.iter(|| encode_batch(black_box(&batch.points)))
    });
}

criterion_group!(
    benches,
    bench_compute_delays,
    bench_convert_station,
    bench_encode_batch
);
criterion_main!(benches);
