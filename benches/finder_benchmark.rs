use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use humor_hub::models::{Event, RawEvent};
use humor_hub::services::finder::{derive_views, FilterParams, Tab};
use serde_json::json;

const CITIES: &[&str] = &["Spokane WA", "Boise ID", "Seattle WA", "Portland OR"];
const DAYS: &[&str] = &[
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Build a synthetic catalog of the given size mixing recurring and
/// one-time events across cities and tabs.
fn synthetic_catalog(count: usize) -> Vec<Event> {
    (0..count)
        .map(|i| {
            let city = CITIES[i % CITIES.len()];
            let recurring = i % 3 != 0;
            let date = if recurring {
                DAYS[i % DAYS.len()].to_string()
            } else {
                format!("2026-{:02}-{:02}", (i % 12) + 1, (i % 28) + 1)
            };

            let raw: RawEvent = serde_json::from_value(json!({
                "name": format!("Event {i}"),
                "location": format!("{} Main St, {}", i, city),
                "date": date,
                "isRecurring": recurring,
                "festival": i % 5 == 0,
                "isMusic": i % 7 == 0,
                "googleTimestamp": format!("2026-01-{:02}T00:00:00Z", (i % 28) + 1),
            }))
            .unwrap();

            Event::from_raw(format!("ev{i}"), &raw)
        })
        .collect()
}

fn benchmark_derive_views(c: &mut Criterion) {
    let events = synthetic_catalog(10_000);
    let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();

    let city_params = FilterParams {
        tab: Tab::Mics,
        city: "Spokane WA".to_string(),
        date,
    };
    let unfiltered_params = FilterParams {
        tab: Tab::Mics,
        city: String::new(),
        date,
    };

    let mut group = c.benchmark_group("derive_views");

    group.bench_function("city_filtered_10k", |b| {
        b.iter(|| derive_views(black_box(&events), black_box(&city_params)))
    });

    group.bench_function("unfiltered_10k", |b| {
        b.iter(|| derive_views(black_box(&events), black_box(&unfiltered_params)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_derive_views);
criterion_main!(benches);
