//! Aggregate reads racing recalculation passes on a shared service.

use std::sync::Arc;

use hwv_core::enums::RecalcPolicy;
use hwv_db::aggregation::RecalcOutcome;
use hwv_db::service::{ServiceOptions, SurveyService};
use hwv_schema::{EmbeddedSchemaProvider, SchemaSession};
use pretty_assertions::assert_eq;

async fn service(policy: RecalcPolicy) -> Arc<SurveyService> {
    let schema = SchemaSession::initialize(&EmbeddedSchemaProvider)
        .await
        .unwrap();
    let options = ServiceOptions {
        recalc_policy: policy,
        ..ServiceOptions::default()
    };
    Arc::new(
        SurveyService::new_local(":memory:", schema, options)
            .await
            .unwrap(),
    )
}

fn survey(device: &str, codec: &str, streams: u32) -> String {
    serde_json::json!({
        "deviceId": device,
        "tests": [{"codec": codec, "resolution": "1080p", "maxStreams": streams}]
    })
    .to_string()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_never_observe_mixed_generations() {
    let svc = service(RecalcPolicy::Queue).await;
    for i in 0..40 {
        svc.submit_hardware_survey(&survey("arc", &format!("codec{}", i % 8), i))
            .await
            .unwrap();
    }
    svc.recalc_hardware_stats().await.unwrap();

    let writer = {
        let svc = Arc::clone(&svc);
        tokio::spawn(async move {
            for i in 0..10 {
                svc.submit_hardware_survey(&survey("arc", "late", i))
                    .await
                    .unwrap();
                svc.recalc_hardware_stats().await.unwrap();
            }
        })
    };

    let mut readers = Vec::new();
    for _ in 0..4 {
        let svc = Arc::clone(&svc);
        readers.push(tokio::spawn(async move {
            for _ in 0..50 {
                let rows = svc.get_submissions("arc").await.unwrap();
                assert!(!rows.is_empty(), "a device once aggregated never disappears");
                let generation = rows[0].generation;
                assert!(
                    rows.iter().all(|row| row.generation == generation),
                    "rows from more than one pass: {rows:?}"
                );
                tokio::task::yield_now().await;
            }
        }));
    }

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }

    let rows = svc.get_submissions("arc").await.unwrap();
    assert_eq!(rows[0].generation, 11);
    assert_eq!(rows[0].submission_count, 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_queued_triggers_all_complete() {
    let svc = service(RecalcPolicy::Queue).await;
    svc.submit_hardware_survey(&survey("t400", "h264", 12))
        .await
        .unwrap();

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move { svc.recalc_hardware_stats().await.unwrap() })
        })
        .collect();

    let mut generations = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            RecalcOutcome::Completed(summary) => generations.push(summary.generation),
            RecalcOutcome::Coalesced => panic!("queue policy never coalesces"),
        }
    }
    generations.sort_unstable();
    assert_eq!(generations, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn submissions_without_device_key_are_stored_but_not_aggregated() {
    let schema_text = r#"{"type": "object"}"#;
    let schema = SchemaSession::from_compiled(Arc::new(
        hwv_schema::SchemaDocument::from_text(schema_text)
            .unwrap()
            .compile()
            .unwrap(),
    ));
    let svc = SurveyService::new_local(":memory:", schema, ServiceOptions::default())
        .await
        .unwrap();

    let id = svc
        .submit_hardware_survey(r#"{"tests": [{"codec": "hevc", "resolution": "1080p", "maxStreams": 3}]}"#)
        .await
        .unwrap();
    assert!(svc.get_single_submission(&id).await.is_ok());

    let RecalcOutcome::Completed(summary) = svc.recalc_hardware_stats().await.unwrap() else {
        panic!("expected a completed pass");
    };
    assert_eq!(summary.submissions, 1);
    assert_eq!(summary.devices, 0);
    assert_eq!(summary.rows, 0);
}
