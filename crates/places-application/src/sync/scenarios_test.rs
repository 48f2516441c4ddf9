//! End-to-end view scenarios against the in-memory backend.

use crate::app::PlacesApp;
use crate::map::MarkerLabel;
use crate::notify::drain;
use crate::sync::list_detail::{PLACE_ADDED, PLACE_ADD_FAILED, PLACE_NOT_FOUND, USER_ADDED};
use crate::sync::lists::LIST_CREATED;
use crate::sync::place_detail::{REVIEW_ADDED, REVIEW_FAILED};
use crate::testing::{FakeBackend, RecordingMapProvider, fresh_token, place};
use places_core::config::ClientConfig;
use places_core::error::{PlacesError, SESSION_EXPIRED_MESSAGE};
use places_core::map::MapContainer;
use places_core::notice::{Notice, NoticeLevel};
use places_core::session::TokenStore;
use places_infrastructure::MemoryTokenStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

const USER: i64 = 7;

fn app_with(
    backend: &Arc<FakeBackend>,
    logged_in: bool,
) -> (PlacesApp, UnboundedReceiver<Notice>, Arc<MemoryTokenStore>) {
    let store = Arc::new(if logged_in {
        MemoryTokenStore::with_token(fresh_token(USER))
    } else {
        MemoryTokenStore::new()
    });
    let (app, notices) = PlacesApp::new(ClientConfig::default(), backend.clone(), store.clone());
    (app, notices, store)
}

fn backend_with_places(count: i64) -> Arc<FakeBackend> {
    let backend = Arc::new(FakeBackend::new());
    for id in 1..=count {
        backend.add_place(place(id, &format!("Place {}", id)));
    }
    backend
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_catalog_paging_bounds() {
    let backend = backend_with_places(12);
    let (app, _notices, _store) = app_with(&backend, true);
    let catalog = app.catalog();

    catalog.load().await.unwrap();
    let first = catalog.snapshot().await;
    assert_eq!(first.page_count(), 3);
    assert_eq!(first.page_items().len(), 5);
    assert!(!first.has_previous());
    assert!(first.has_next());

    assert!(catalog.next_page().await);
    assert!(catalog.next_page().await);
    assert!(!catalog.next_page().await);

    let last = catalog.snapshot().await;
    assert_eq!(last.page(), 3);
    assert_eq!(last.page_items().len(), 2);
    assert!(!last.has_next());
    assert!(last.has_previous());

    assert!(catalog.previous_page().await);
    assert_eq!(catalog.snapshot().await.page(), 2);
}

#[tokio::test]
async fn test_catalog_exact_multiple_has_no_empty_page() {
    let backend = backend_with_places(10);
    let (app, _notices, _store) = app_with(&backend, true);
    let catalog = app.catalog();
    catalog.load().await.unwrap();

    catalog.go_to_page(99).await;
    let state = catalog.snapshot().await;
    assert_eq!(state.page(), 2);
    assert_eq!(state.page_count(), 2);
    assert!(!state.has_next());
}

#[tokio::test]
async fn test_catalog_keeps_stale_data_on_error() {
    let backend = backend_with_places(3);
    let (app, _notices, _store) = app_with(&backend, true);
    let catalog = app.catalog();
    catalog.load().await.unwrap();

    backend.fail("search_places", PlacesError::network("connection refused"));
    assert!(catalog.load().await.is_err());

    let state = catalog.snapshot().await;
    assert_eq!(state.places.len(), 3);
    assert!(!state.loading);
    assert!(state.last_error.as_ref().is_some_and(PlacesError::is_network));
}

#[tokio::test]
async fn test_catalog_search_by_name() {
    let backend = backend_with_places(12);
    let (app, _notices, _store) = app_with(&backend, true);
    let catalog = app.catalog();

    catalog.search("place 1").await.unwrap();
    // "Place 1", "Place 10", "Place 11", "Place 12"
    assert_eq!(catalog.snapshot().await.places.len(), 4);
    assert_eq!(backend.calls(), vec!["search_places place 1"]);
}

// ============================================================================
// Place view
// ============================================================================

fn bar_and_cafe() -> Arc<FakeBackend> {
    let backend = Arc::new(FakeBackend::new());
    let mut p = place(42, "Old Tavern");
    p.category = vec!["bar".into(), "cafe".into()];
    backend.add_place(p);
    backend
}

#[tokio::test]
async fn test_unchanged_edit_round_trips_categories() {
    let backend = bar_and_cafe();
    let (app, _notices, _store) = app_with(&backend, true);
    let view = app.place_detail();
    view.load(42).await.unwrap();

    view.begin_edit().await.unwrap();
    assert_eq!(view.snapshot().await.edit.unwrap().category, "bar, cafe");

    view.submit_edit().await.unwrap();

    assert_eq!(
        backend.last_update().unwrap().category,
        vec!["bar".to_string(), "cafe".to_string()]
    );
    let state = view.snapshot().await;
    assert!(state.edit.is_none());
    assert_eq!(backend.call_count("get_place"), 2);
}

#[tokio::test]
async fn test_edit_refetches_server_state() {
    let backend = bar_and_cafe();
    let (app, _notices, _store) = app_with(&backend, true);
    let view = app.place_detail();
    view.load(42).await.unwrap();
    let markers_before = view.snapshot().await.place_markers;

    view.begin_edit().await.unwrap();
    assert!(
        view.edit(|form| {
            form.name = "New Tavern".into();
            form.category = "pub, , bar ".into();
        })
        .await
    );
    view.submit_edit().await.unwrap();

    let state = view.snapshot().await;
    assert_eq!(state.place, backend.server_place(42));
    assert_eq!(state.place.unwrap().category, vec!["pub", "bar"]);
    assert!(!Arc::ptr_eq(&markers_before, &state.place_markers));
}

#[tokio::test]
async fn test_cancel_edit_makes_no_call() {
    let backend = bar_and_cafe();
    let (app, _notices, _store) = app_with(&backend, true);
    let view = app.place_detail();
    view.load(42).await.unwrap();

    view.begin_edit().await.unwrap();
    view.edit(|form| form.name = "Discarded".into()).await;
    view.cancel_edit().await;

    assert!(view.snapshot().await.edit.is_none());
    assert_eq!(view.snapshot().await.place.unwrap().name, "Old Tavern");
    assert_eq!(backend.call_count("update_place"), 0);
    assert!(!view.edit(|form| form.name = "x".into()).await);
}

#[tokio::test]
async fn test_failed_edit_keeps_buffer_and_state() {
    let backend = bar_and_cafe();
    backend.fail("update_place", PlacesError::server(500, None));
    let (app, mut notices, _store) = app_with(&backend, true);
    let view = app.place_detail();
    view.load(42).await.unwrap();

    view.begin_edit().await.unwrap();
    view.edit(|form| form.name = "Renamed".into()).await;
    assert!(view.submit_edit().await.is_err());

    let state = view.snapshot().await;
    assert_eq!(state.edit.unwrap().name, "Renamed");
    assert_eq!(state.place.unwrap().name, "Old Tavern");
    assert!(drain(&mut notices).iter().any(Notice::is_error));
}

#[tokio::test]
async fn test_submit_review_refetches_place_and_reviews() {
    let backend = bar_and_cafe();
    let (app, mut notices, _store) = app_with(&backend, true);
    let view = app.place_detail();
    view.load(42).await.unwrap();

    view.open_review_form().await;
    assert_eq!(view.snapshot().await.review_form.unwrap().score, 5);

    view.submit_review("Great beer", 9).await.unwrap();

    let state = view.snapshot().await;
    assert!(state.review_form.is_none());
    assert_eq!(state.reviews.len(), 1);
    assert_eq!(state.reviews[0].id_user, USER);
    let place = state.place.unwrap();
    assert_eq!(place.total_reviews, 1);
    assert_eq!(place.average_rating, 9.0);

    let notices = drain(&mut notices);
    assert_eq!(notices.last().unwrap().message, REVIEW_ADDED);
}

#[tokio::test]
async fn test_invalid_review_is_refused_locally() {
    let backend = bar_and_cafe();
    let (app, mut notices, _store) = app_with(&backend, true);
    let view = app.place_detail();
    view.load(42).await.unwrap();

    assert!(view.submit_review("Too good", 11).await.is_err());
    assert!(view.submit_review("   ", 5).await.is_err());

    assert_eq!(backend.call_count("add_review"), 0);
    assert_eq!(drain(&mut notices).len(), 2);
}

#[tokio::test]
async fn test_failed_review_notifies() {
    let backend = bar_and_cafe();
    backend.fail("add_review", PlacesError::network("timeout"));
    let (app, mut notices, _store) = app_with(&backend, true);
    let view = app.place_detail();
    view.load(42).await.unwrap();
    view.open_review_form().await;

    assert!(view.submit_review("Nice", 7).await.is_err());

    assert!(view.snapshot().await.review_form.is_some());
    let notices = drain(&mut notices);
    assert_eq!(notices.last().unwrap().message, REVIEW_FAILED);
}

#[tokio::test]
async fn test_unmount_during_place_fetch() {
    let backend = bar_and_cafe();
    let _gate = backend.hold_place_fetches();
    let (app, _notices, _store) = app_with(&backend, true);
    let view = Arc::new(app.place_detail());

    let pending = {
        let view = view.clone();
        tokio::spawn(async move { view.load(42).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    view.unmount();

    assert!(pending.await.unwrap().is_ok());
    let state = view.snapshot().await;
    assert!(state.place.is_none());
    assert!(state.reviews.is_empty());
}

#[tokio::test]
async fn test_unmount_lets_pending_review_land() {
    let backend = bar_and_cafe();
    let (app, mut notices, _store) = app_with(&backend, true);
    let view = Arc::new(app.place_detail());
    view.load(42).await.unwrap();
    let gate = backend.hold_writes();

    let pending = {
        let view = view.clone();
        tokio::spawn(async move { view.submit_review("Still counts", 8).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    view.unmount();
    gate.notify_one();

    assert!(pending.await.unwrap().is_ok());
    assert_eq!(backend.call_count("add_review"), 1);
    assert_eq!(backend.server_place(42).unwrap().total_reviews, 1);

    // The view is gone: no re-fetch, no notice.
    let state = view.snapshot().await;
    assert!(state.reviews.is_empty());
    assert_eq!(state.place.unwrap().total_reviews, 0);
    assert_eq!(backend.call_count("get_place"), 1);
    assert!(drain(&mut notices).is_empty());
}

#[tokio::test]
async fn test_unmount_lets_pending_list_write_land() {
    let backend = list_backend();
    let (app, _notices, _store) = app_with(&backend, true);
    let view = Arc::new(app.list_detail());
    view.load(7).await.unwrap();
    let gate = backend.hold_writes();

    let pending = {
        let view = view.clone();
        tokio::spawn(async move { view.add_place_by_name("place 2").await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    view.unmount();
    gate.notify_one();

    assert!(pending.await.unwrap().is_ok());
    assert_eq!(backend.server_list_place_ids(7), vec![1, 2]);
    assert_eq!(view.snapshot().await.places.len(), 1);
}

#[tokio::test]
async fn test_expired_session_aborts_write_before_network() {
    let backend = bar_and_cafe();
    let (app, mut notices, store) = app_with(&backend, true);
    let view = app.place_detail();
    view.load(42).await.unwrap();
    view.begin_edit().await.unwrap();

    store.clear().await.unwrap();
    let err = view.submit_edit().await.unwrap_err();

    assert_eq!(err, PlacesError::SessionExpired);
    assert_eq!(backend.call_count("update_place"), 0);
    let notices = drain(&mut notices);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, SESSION_EXPIRED_MESSAGE);
}

// ============================================================================
// List view
// ============================================================================

fn list_backend() -> Arc<FakeBackend> {
    let backend = backend_with_places(3);
    backend.add_list(7, "Weekend", USER);
    backend.link_place(7, 1);
    backend.add_user(8, "bob");
    backend
}

#[tokio::test]
async fn test_add_unknown_place_writes_nothing() {
    let backend = list_backend();
    let (app, mut notices, _store) = app_with(&backend, true);
    let view = app.list_detail();
    view.load(7).await.unwrap();

    let err = view.add_place_by_name("Atlantis").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(backend.call_count("add_list_place"), 0);
    let notices = drain(&mut notices);
    assert_eq!(notices, vec![Notice::error(PLACE_NOT_FOUND)]);
}

#[tokio::test]
async fn test_add_place_refetches_places() {
    let backend = list_backend();
    let (app, mut notices, _store) = app_with(&backend, true);
    let view = app.list_detail();
    view.load(7).await.unwrap();
    assert_eq!(view.snapshot().await.places.len(), 1);

    view.add_place_by_name("place 3").await.unwrap();

    let ids: Vec<i64> = view.snapshot().await.places.iter().map(|p| p.id).collect();
    assert_eq!(ids, backend.server_list_place_ids(7));
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(drain(&mut notices), vec![Notice::success(PLACE_ADDED)]);
    assert_eq!(backend.tokens_seen().len(), 1);
}

#[tokio::test]
async fn test_remove_place_and_users_roundtrip() {
    let backend = list_backend();
    let (app, mut notices, _store) = app_with(&backend, true);
    let view = app.list_detail();
    view.load(7).await.unwrap();

    view.remove_place(1).await.unwrap();
    assert!(view.snapshot().await.places.is_empty());

    view.add_user("bob").await.unwrap();
    let users: Vec<i64> = view.snapshot().await.users.iter().map(|u| u.id).collect();
    assert_eq!(users, backend.server_list_user_ids(7));
    assert_eq!(users, vec![8]);

    view.remove_user(8).await.unwrap();
    assert!(view.snapshot().await.users.is_empty());

    let levels: Vec<NoticeLevel> = drain(&mut notices).iter().map(|n| n.level).collect();
    assert_eq!(levels, vec![NoticeLevel::Success; 3]);
}

#[tokio::test]
async fn test_failed_add_user_keeps_members() {
    let backend = list_backend();
    let (app, mut notices, _store) = app_with(&backend, true);
    let view = app.list_detail();
    view.load(7).await.unwrap();
    view.add_user("bob").await.unwrap();
    drain(&mut notices);

    assert!(view.add_user("nobody").await.is_err());

    assert_eq!(view.snapshot().await.users.len(), 1);
    let notices = drain(&mut notices);
    assert_eq!(notices.len(), 1);
    assert!(notices[0].is_error());
    assert_ne!(notices[0].message, USER_ADDED);
}

#[tokio::test]
async fn test_add_place_without_session_skips_lookup() {
    let backend = list_backend();
    let (app, mut notices, store) = app_with(&backend, true);
    let view = app.list_detail();
    view.load(7).await.unwrap();
    store.clear().await.unwrap();

    let err = view.add_place_by_name("place 2").await.unwrap_err();

    assert_eq!(err, PlacesError::SessionExpired);
    assert_eq!(backend.call_count("search_places"), 0);
    assert_eq!(backend.call_count("add_list_place"), 0);
    assert_eq!(
        drain(&mut notices),
        vec![Notice::error(SESSION_EXPIRED_MESSAGE)]
    );
}

#[tokio::test]
async fn test_place_lookup_failure_notifies() {
    let backend = list_backend();
    let (app, mut notices, _store) = app_with(&backend, true);
    let view = app.list_detail();
    view.load(7).await.unwrap();
    backend.fail("search_places", PlacesError::network("refused"));

    assert!(view.add_place_by_name("place 2").await.is_err());
    assert_eq!(drain(&mut notices), vec![Notice::error(PLACE_ADD_FAILED)]);
    assert_eq!(backend.call_count("add_list_place"), 0);
}

#[tokio::test]
async fn test_list_map_follows_refetches() {
    let backend = list_backend();
    let (app, _notices, _store) = app_with(&backend, true);
    let provider = Arc::new(RecordingMapProvider::new());
    let container = MapContainer::new("list-map");
    let view = app.list_detail();
    let mut map = app.list_map(provider.clone());

    view.load(7).await.unwrap();
    let places = view.snapshot().await.places;
    map.render(Some(&container), &places).unwrap();
    let unchanged = view.snapshot().await.places;
    map.render(Some(&container), &unchanged).unwrap();
    assert_eq!(provider.init_count(), 1);

    view.add_place_by_name("place 2").await.unwrap();
    let refetched = view.snapshot().await.places;
    map.render(Some(&container), &refetched).unwrap();

    assert_eq!(provider.init_count(), 2);
    assert_eq!(provider.live_instances(), 1);
    assert_eq!(map.markers().len(), 2);
    let balloon = &map.markers()[&2].balloon;
    assert_eq!(
        balloon,
        &MarkerLabel::Rating.balloon(&backend.server_place(2).unwrap())
    );

    view.unmount();
    map.unmount();
    assert_eq!(provider.live_instances(), 0);
}

#[tokio::test]
async fn test_list_load_failure_keeps_previous_data() {
    let backend = list_backend();
    let (app, _notices, _store) = app_with(&backend, true);
    let view = app.list_detail();
    view.load(7).await.unwrap();

    backend.fail("get_list_users", PlacesError::server(500, None));
    assert!(view.load(7).await.is_err());

    let state = view.snapshot().await;
    assert_eq!(state.list.unwrap().name, "Weekend");
    assert_eq!(state.places.len(), 1);
    assert!(state.last_error.is_some());
    assert!(!state.loading);
}

// ============================================================================
// My lists
// ============================================================================

#[tokio::test]
async fn test_create_list_refetches() {
    let backend = list_backend();
    let (app, mut notices, _store) = app_with(&backend, true);
    let lists = app.lists();
    lists.load().await.unwrap();
    assert_eq!(lists.snapshot().await.lists.len(), 1);

    lists.create("  Museums ").await.unwrap();

    let names: Vec<String> = lists
        .snapshot()
        .await
        .lists
        .iter()
        .map(|l| l.name.clone())
        .collect();
    assert_eq!(names, backend.server_list_names());
    assert_eq!(names, vec!["Weekend", "Museums"]);
    assert_eq!(drain(&mut notices), vec![Notice::success(LIST_CREATED)]);
}

#[tokio::test]
async fn test_blank_list_name_is_refused_locally() {
    let backend = list_backend();
    let (app, mut notices, _store) = app_with(&backend, true);
    let lists = app.lists();

    assert!(lists.create("   ").await.is_err());
    assert_eq!(backend.call_count("create_list"), 0);
    assert_eq!(
        drain(&mut notices),
        vec![Notice::error("List name is required")]
    );
}

#[tokio::test]
async fn test_lists_require_session() {
    let backend = list_backend();
    let (app, _notices, _store) = app_with(&backend, false);

    assert_eq!(
        app.lists().load().await.unwrap_err(),
        PlacesError::SessionExpired
    );
    assert_eq!(backend.call_count("get_lists"), 0);
}
