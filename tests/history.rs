//! Publication tracker integration tests: append ordering and
//! persistence across reopen cycles.

use tempfile::TempDir;

use draftpress::core::PublicationTracker;
use draftpress::PublishRecord;

#[tokio::test]
async fn test_n_appends_yield_n_ordered_entries() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("post_history.json");

    let mut tracker = PublicationTracker::open(&path).await.unwrap();
    for i in 0..5 {
        tracker
            .record(PublishRecord::created(format!("post-{i}"), format!("Title {i}")))
            .await
            .unwrap();
    }

    let ids: Vec<&str> = tracker
        .history()
        .iter()
        .map(|r| r.post_id.as_str())
        .collect();
    assert_eq!(ids, vec!["post-0", "post-1", "post-2", "post-3", "post-4"]);
}

#[tokio::test]
async fn test_load_append_reload_preserves_prior_entries() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("post_history.json");

    {
        let mut tracker = PublicationTracker::open(&path).await.unwrap();
        tracker
            .record(PublishRecord::created("1", "First"))
            .await
            .unwrap();
        tracker
            .record(PublishRecord::created("2", "Second"))
            .await
            .unwrap();
    }

    // a later run restores the prior history and appends to it
    {
        let mut tracker = PublicationTracker::open(&path).await.unwrap();
        assert_eq!(tracker.history().len(), 2);

        tracker
            .record(PublishRecord::updated("1", "First (revised)"))
            .await
            .unwrap();
    }

    let tracker = PublicationTracker::open(&path).await.unwrap();
    let records = tracker.history();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].post_id, "1");
    assert_eq!(records[1].post_id, "2");
    assert_eq!(records[2].post_id, "1");
    assert!(records[2].updated_at.is_some());
    assert!(records[2].created_at.is_none());
}

#[tokio::test]
async fn test_persisted_file_is_valid_json_after_every_append() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("post_history.json");

    let mut tracker = PublicationTracker::open(&path).await.unwrap();

    for i in 0..3 {
        tracker
            .record(PublishRecord::created(i.to_string(), "Post"))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<PublishRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), i + 1);
    }
}
