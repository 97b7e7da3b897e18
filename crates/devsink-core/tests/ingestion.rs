use std::path::Path;

use devsink_core::{ArtifactStore, DeviceIdProfile, IngestOutcome, Ingestor, Rejection};
use serde_json::{json, Value};

fn ingestor(root: &Path, profile: DeviceIdProfile) -> Ingestor {
    Ingestor::new(profile, ArtifactStore::new(root.join("data")))
}

fn artifact_count(root: &Path) -> usize {
    let data = root.join("data");
    if !data.exists() {
        return 0;
    }
    std::fs::read_dir(data)
        .unwrap()
        .map(|entry| std::fs::read_dir(entry.unwrap().path()).unwrap().count())
        .sum()
}

#[tokio::test]
async fn accepted_payload_is_stored_verbatim() {
    let tmp = tempfile::tempdir().unwrap();
    let ingestor = ingestor(tmp.path(), DeviceIdProfile::Extended);
    let payload = json!({"deviceId": "D1234567890ABCDEF", "temp": 21.5, "nested": {"ok": true}});

    let outcome = ingestor.ingest(&payload).await.unwrap();

    let artifact = match outcome {
        IngestOutcome::Stored(artifact) => artifact,
        other => panic!("expected payload to be stored, got {other:?}"),
    };
    assert_eq!(artifact.device_id.as_str(), "D1234567890ABCDEF");
    assert_eq!(
        artifact.path.parent().unwrap(),
        tmp.path().join("data").join("D1234567890ABCDEF")
    );
    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(&artifact.path).unwrap()).unwrap();
    assert_eq!(written, payload);
}

#[tokio::test]
async fn rejected_payloads_write_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let ingestor = ingestor(tmp.path(), DeviceIdProfile::Extended);

    let cases = [
        (
            json!({"deviceId": "X1234567890ABCDE"}),
            Rejection::InvalidDeviceId("X1234567890ABCDE".into()),
        ),
        (json!({}), Rejection::MissingDeviceId),
        (json!({"deviceId": ""}), Rejection::InvalidDeviceId(String::new())),
        (json!({"deviceId": 42}), Rejection::DeviceIdNotString),
        (json!({"deviceId": null}), Rejection::DeviceIdNotString),
        (json!(["D1234567890ABCDEF"]), Rejection::NotAnObject),
        (json!("D1234567890ABCDEF"), Rejection::NotAnObject),
    ];

    for (payload, expected) in cases {
        let outcome = ingestor.ingest(&payload).await.unwrap();
        assert_eq!(outcome, IngestOutcome::Rejected(expected), "payload {payload}");
    }

    assert!(!tmp.path().join("data").exists());
}

#[tokio::test]
async fn standard_profile_drops_mioty_ids() {
    let tmp = tempfile::tempdir().unwrap();
    let payload = json!({"deviceId": "M00AABBCCDDEEFF11"});

    let standard = ingestor(tmp.path(), DeviceIdProfile::Standard);
    assert!(!standard.ingest(&payload).await.unwrap().is_stored());
    assert_eq!(artifact_count(tmp.path()), 0);

    let extended = ingestor(tmp.path(), DeviceIdProfile::Extended);
    assert!(extended.ingest(&payload).await.unwrap().is_stored());
    assert_eq!(artifact_count(tmp.path()), 1);
}

#[tokio::test]
async fn repeated_ingest_reuses_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let ingestor = ingestor(tmp.path(), DeviceIdProfile::Extended);
    let payload = json!({"deviceId": "G12345678901234567A", "seq": 1});

    let first = ingestor.ingest(&payload).await.unwrap();
    let second = ingestor.ingest(&payload).await.unwrap();

    let (IngestOutcome::Stored(first), IngestOutcome::Stored(second)) = (first, second) else {
        panic!("both payloads should be stored");
    };
    assert_eq!(first.path.parent(), second.path.parent());
    assert_ne!(first.path, second.path);

    let on_disk = std::fs::read_dir(first.path.parent().unwrap()).unwrap().count();
    assert_eq!(on_disk, 2);
}

#[test]
fn validate_does_not_touch_the_filesystem() {
    let ingestor = Ingestor::new(
        DeviceIdProfile::Standard,
        ArtifactStore::new("/nonexistent/devsink"),
    );
    let id = ingestor
        .validate(&json!({"deviceId": "D1234567890ABCDEF"}))
        .unwrap();
    assert_eq!(id.as_str(), "D1234567890ABCDEF");
    assert!(!Path::new("/nonexistent/devsink").exists());
}
