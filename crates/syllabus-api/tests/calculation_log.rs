use std::sync::Arc;

use contracts::{CastRequest, Location, LostItemQuery, Scheme, SyllabusConfig};
use syllabus_api::{OracleApi, SilentNarrativeService};

fn api_at(path: &std::path::Path) -> OracleApi {
    let mut api =
        OracleApi::with_narrative(SyllabusConfig::default(), Arc::new(SilentNarrativeService));
    api.attach_sqlite_store(path).expect("attach sqlite store");
    api
}

#[tokio::test]
async fn log_counter_and_location_survive_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("syllabus_logs.sqlite");

    {
        let mut api = api_at(&path);
        api.lost_item(&LostItemQuery {
            item_name: "Wallet".to_string(),
            date_lost: "2023-12-31".to_string(),
            seeker_name: "Sam".to_string(),
            scheme: Scheme::Chaldean,
        });
        api.cast_charms(&CastRequest {
            intent: "where to next".to_string(),
            seed: Some(7),
        })
        .await
        .expect("cast");
        api.set_user_location(Location {
            lat: 35.68,
            lng: 139.69,
        })
        .expect("set location");
        assert!(api.last_persistence_error().is_none());
    }

    let api = api_at(&path);
    assert_eq!(api.status().calculations_run, 2);

    let entries = api.logs(None).expect("all logs");
    assert_eq!(entries.len(), 2);
    let modules = entries
        .iter()
        .map(|entry| entry.module.as_str())
        .collect::<Vec<_>>();
    assert!(modules.contains(&"LOST_ITEM"));
    assert!(modules.contains(&"CHARM_CASTING"));

    let casts = api.logs(Some("CHARM_CASTING")).expect("cast logs");
    assert_eq!(casts[0].query, "where to next");
    assert_eq!(casts[0].result["seed"], "7");

    assert_eq!(
        api.user_location().expect("location"),
        Some(Location {
            lat: 35.68,
            lng: 139.69
        })
    );
}

#[test]
fn newest_entries_come_first() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut api = api_at(&dir.path().join("order.sqlite"));

    for item in ["First", "Second", "Third"] {
        api.lost_item(&LostItemQuery {
            item_name: item.to_string(),
            date_lost: "2024-01-01".to_string(),
            seeker_name: String::new(),
            scheme: Scheme::Pythagorean,
        });
    }

    let queries = api
        .logs(Some("LOST_ITEM"))
        .expect("logs")
        .into_iter()
        .map(|entry| entry.query)
        .collect::<Vec<_>>();
    assert_eq!(
        queries,
        vec![
            "Third (2024-01-01)",
            "Second (2024-01-01)",
            "First (2024-01-01)"
        ]
    );
}
