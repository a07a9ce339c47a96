// Runs the backend contract suite against the in-memory backend.

mod common;

use blog_server::MemoryStorage;

#[tokio::test]
async fn post_round_trip() {
    common::contract::post_round_trip(&MemoryStorage::new()).await;
}

#[tokio::test]
async fn duplicate_post_slug_rejected() {
    common::contract::duplicate_post_slug_rejected(&MemoryStorage::new()).await;
}

#[tokio::test]
async fn update_post_slug_conflict() {
    common::contract::update_post_slug_conflict(&MemoryStorage::new()).await;
}

#[tokio::test]
async fn missing_post_semantics() {
    common::contract::missing_post_semantics(&MemoryStorage::new()).await;
}

#[tokio::test]
async fn update_merges_partial_fields() {
    common::contract::update_merges_partial_fields(&MemoryStorage::new()).await;
}

#[tokio::test]
async fn post_listing_ordering_and_filters() {
    common::contract::post_listing_ordering_and_filters(&MemoryStorage::new()).await;
}

#[tokio::test]
async fn view_counter_is_atomic_per_call() {
    common::contract::view_counter_is_atomic_per_call(&MemoryStorage::new()).await;
}

#[tokio::test]
async fn category_round_trip_and_name_ordering() {
    common::contract::category_round_trip_and_name_ordering(&MemoryStorage::new()).await;
}

#[tokio::test]
async fn duplicate_category_slug_rejected() {
    common::contract::duplicate_category_slug_rejected(&MemoryStorage::new()).await;
}

#[tokio::test]
async fn category_delete_semantics() {
    common::contract::category_delete_semantics(&MemoryStorage::new()).await;
}

#[tokio::test]
async fn post_counting_per_category() {
    common::contract::post_counting_per_category(&MemoryStorage::new()).await;
}

#[tokio::test]
async fn media_scoped_listing() {
    common::contract::media_scoped_listing(&MemoryStorage::new()).await;
}

#[tokio::test]
async fn affiliate_click_increments() {
    common::contract::affiliate_click_increments(&MemoryStorage::new()).await;
}

#[tokio::test]
async fn cta_click_increments() {
    common::contract::cta_click_increments(&MemoryStorage::new()).await;
}

#[tokio::test]
async fn events_are_append_only_and_ordered() {
    common::contract::events_are_append_only_and_ordered(&MemoryStorage::new()).await;
}

#[tokio::test]
async fn settings_upsert_in_place() {
    common::contract::settings_upsert_in_place(&MemoryStorage::new()).await;
}

#[tokio::test]
async fn usernames_are_unique() {
    common::contract::usernames_are_unique(&MemoryStorage::new()).await;
}
