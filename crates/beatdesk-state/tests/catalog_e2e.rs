//! End-to-end tests for the catalog store against a mock backend.

use std::sync::Arc;
use std::time::Duration;

use beatdesk_client::ApiClient;
use beatdesk_state::{CatalogStore, StoreContext, Toaster, ToastVariant};
use beatdesk_types::{CatalogFilters, CatalogUpdate, ContentState, ScheduleRequest};
use chrono::Utc;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn item(id: &str, title: &str, blocked: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "contentType": "track",
        "artist": "The Weeknd",
        "blockedByAdmin": blocked,
        "blockReason": if blocked { json!("Copyright claim") } else { Value::Null },
        "effectiveState": if blocked { "blocked" } else { "published" },
        "availableRegions": []
    })
}

fn page(items: Vec<Value>) -> Value {
    let total = items.len();
    json!({
        "content": items,
        "totalElements": total,
        "page": 0,
        "size": 20
    })
}

fn ok(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

fn create_store(server: &MockServer) -> (CatalogStore, Arc<Toaster>) {
    let client = ApiClient::new(server.uri()).unwrap();
    let toaster = Arc::new(Toaster::default());
    let store = CatalogStore::new(StoreContext::new(client, toaster.clone()));
    (store, toaster)
}

// ==================== Fetch Tests ====================

#[tokio::test]
async fn test_search_returns_matches_and_keeps_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/content"))
        .and(query_param("search", "Weeknd"))
        .respond_with(ok(page(vec![
            item("c1", "Blinding Lights", false),
            item("c2", "Starboy", false),
        ])))
        .mount(&server)
        .await;

    let (store, toaster) = create_store(&server);
    let filters = CatalogFilters::search("Weeknd");

    assert!(store.fetch_catalog(filters.clone()).await);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.data.as_ref().unwrap().len(), 2);
    assert_eq!(snapshot.current_filters, Some(filters));
    assert!(!snapshot.loading);
    assert!(snapshot.error.is_none());
    assert!(toaster.is_empty());
}

#[tokio::test]
async fn test_fetch_failure_truncates_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "title": "Internal Server Error",
            "detail": "e".repeat(500)
        })))
        .mount(&server)
        .await;

    let (store, toaster) = create_store(&server);

    assert!(!store.fetch_catalog(CatalogFilters::default()).await);

    let snapshot = store.snapshot();
    let error = snapshot.error.unwrap();
    assert_eq!(error.chars().count(), 203);
    assert!(error.ends_with("..."));
    assert!(snapshot.data.is_none());
    assert!(!snapshot.loading);

    let toasts = toaster.active();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].toast.variant, ToastVariant::Destructive);
    assert_eq!(toasts[0].toast.description.as_deref(), Some(error.as_str()));
}

#[tokio::test]
async fn test_stale_response_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/content"))
        .and(query_param("search", "slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page(vec![item("old", "Old Result", false)]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/content"))
        .and(query_param("search", "fast"))
        .respond_with(ok(page(vec![item("new", "New Result", false)])))
        .mount(&server)
        .await;

    let (store, _toaster) = create_store(&server);
    let slow = store.fetch_catalog(CatalogFilters::search("slow"));
    let fast = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.fetch_catalog(CatalogFilters::search("fast")).await
    };
    let (slow_ok, fast_ok) = tokio::join!(slow, fast);
    assert!(slow_ok && fast_ok);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.data.unwrap().content[0].id, "new");
    assert_eq!(snapshot.current_filters, Some(CatalogFilters::search("fast")));
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn test_fetch_item_selects_and_refreshes_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/content"))
        .respond_with(ok(page(vec![item("c1", "Draft", false)])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/content/c1"))
        .respond_with(ok(item("c1", "Final", false)))
        .mount(&server)
        .await;

    let (store, _toaster) = create_store(&server);
    assert!(store.fetch_catalog(CatalogFilters::default()).await);
    assert!(store.fetch_item("c1").await);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.selected.unwrap().title, "Final");
    assert_eq!(snapshot.data.unwrap().find("c1").unwrap().title, "Final");

    store.clear_selection();
    assert!(store.snapshot().selected.is_none());
    assert!(store.select("c1"));
    assert!(!store.select("missing"));
}

// ==================== Mutation Tests ====================

#[tokio::test]
async fn test_unblock_twice_is_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/content"))
        .respond_with(ok(page(vec![item("c1", "Blinding Lights", true)])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/content"))
        .respond_with(ok(page(vec![item("c1", "Blinding Lights", false)])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/content/c1/unblock"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    let (store, toaster) = create_store(&server);
    assert!(store.fetch_catalog(CatalogFilters::default()).await);

    assert!(store.unblock_item("c1").await);
    assert!(store.unblock_item("c1").await);

    let data = store.snapshot().data.unwrap();
    assert_eq!(data.len(), 1);
    let record = data.find("c1").unwrap();
    assert!(!record.blocked_by_admin);
    assert_eq!(record.effective_state, ContentState::Published);
    assert_eq!(toaster.len(), 2);
}

#[tokio::test]
async fn test_block_converges_with_server_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/content"))
        .and(query_param("search", "Weeknd"))
        .respond_with(ok(page(vec![item("c1", "Blinding Lights", false)])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/content"))
        .and(query_param("search", "Weeknd"))
        .respond_with(ok(page(vec![item("c1", "Blinding Lights", true)])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/content/c1/block"))
        .and(body_json(json!({"reason": "Copyright claim"})))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let (store, toaster) = create_store(&server);
    assert!(store.fetch_catalog(CatalogFilters::search("Weeknd")).await);

    let mut updates = store.subscribe();
    let (blocked, optimistic) = tokio::join!(
        store.block_item("c1", Some("Copyright claim".to_string())),
        async {
            updates
                .wait_for(|s| s.unreconciled)
                .await
                .unwrap()
                .data
                .clone()
                .unwrap()
        }
    );
    assert!(blocked);

    let snapshot = store.snapshot();
    assert!(!snapshot.unreconciled);
    let local = optimistic.find("c1").unwrap();
    let server_side = snapshot.data.as_ref().unwrap().find("c1").unwrap();
    assert_eq!(local.blocked_by_admin, server_side.blocked_by_admin);
    assert_eq!(local.block_reason, server_side.block_reason);
    assert_eq!(local.effective_state, server_side.effective_state);
    assert_eq!(snapshot.current_filters, Some(CatalogFilters::search("Weeknd")));
    assert_eq!(toaster.active()[0].toast.title, "Content blocked");
}

#[tokio::test]
async fn test_failed_update_rolls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/content"))
        .respond_with(ok(page(vec![item("c1", "Blinding Lights", false)])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/content/c1"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": "Title too long"})))
        .mount(&server)
        .await;

    let (store, toaster) = create_store(&server);
    assert!(store.fetch_catalog(CatalogFilters::default()).await);
    assert!(store.select("c1"));
    let before = store.snapshot();

    let update = CatalogUpdate {
        title: Some("x".repeat(300)),
        artist: None,
    };
    assert!(!store.update_item("c1", update).await);

    let after = store.snapshot();
    assert_eq!(after.data, before.data);
    assert_eq!(after.selected, before.selected);
    assert_eq!(after.error.as_deref(), Some("Title too long"));
    assert!(!after.loading);
    assert_eq!(toaster.active()[0].toast.title, "Failed to update content");
}

#[tokio::test]
async fn test_availability_before_first_fetch() {
    let server = MockServer::start().await;
    let mut restricted = item("c1", "Blinding Lights", false);
    restricted["availableRegions"] = json!(["BR", "PT"]);
    Mock::given(method("GET"))
        .and(path("/content"))
        .respond_with(ok(page(vec![restricted.clone()])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/content/c1/availability"))
        .and(body_json(json!({"regions": ["BR", "PT"]})))
        .respond_with(ok(restricted))
        .mount(&server)
        .await;

    let (store, _toaster) = create_store(&server);
    assert!(
        store
            .set_availability("c1", vec!["BR".to_string(), "PT".to_string()])
            .await
    );

    let data = store.snapshot().data.unwrap();
    let record = data.find("c1").unwrap();
    assert!(record.is_available_in("br"));
    assert!(!record.is_available_in("US"));
}

#[tokio::test]
async fn test_schedule_moves_item_to_scheduled() {
    let server = MockServer::start().await;
    let schedule = ScheduleRequest {
        publish_at: Utc::now() + chrono::Duration::days(7),
        unpublish_at: None,
    };
    let mut scheduled = item("c1", "Blinding Lights", false);
    scheduled["effectiveState"] = json!("scheduled");
    scheduled["publishAt"] = json!(schedule.publish_at);
    Mock::given(method("GET"))
        .and(path("/content"))
        .respond_with(ok(page(vec![item("c1", "Blinding Lights", false)])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/content"))
        .respond_with(ok(page(vec![scheduled.clone()])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/content/c1/schedule"))
        .and(body_json(json!({"publishAt": schedule.publish_at})))
        .respond_with(ok(scheduled).set_delay(Duration::from_millis(200)))
        .expect(1)
        .mount(&server)
        .await;

    let (store, toaster) = create_store(&server);
    assert!(store.fetch_catalog(CatalogFilters::default()).await);

    let pending = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.snapshot()
    };
    let (saved, during) = tokio::join!(store.schedule_item("c1", schedule.clone()), pending);
    assert!(saved);

    let patched = during.data.unwrap().find("c1").cloned().unwrap();
    assert_eq!(patched.effective_state, ContentState::Scheduled);
    assert_eq!(patched.publish_at, Some(schedule.publish_at));
    assert!(during.loading);
    assert!(during.unreconciled);

    let snapshot = store.snapshot();
    let record = snapshot.data.unwrap().find("c1").cloned().unwrap();
    assert_eq!(record.effective_state, ContentState::Scheduled);
    assert!(!snapshot.unreconciled);
    assert_eq!(toaster.active()[0].toast.title, "Schedule saved");
}
