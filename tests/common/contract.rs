//! The behavioral contract every storage backend must satisfy.
//!
//! Each function takes `&dyn Storage` and asserts one slice of the
//! contract; `memory_storage.rs` and `postgres_storage.rs` run the same
//! functions against their respective backends, which is what guarantees
//! the two stay observably identical.

use blog_server::models::*;
use blog_server::{Error, PostFilter, Storage};
use blog_server::utils::PaginationParams;
use uuid::Uuid;

use super::{sample_category, sample_media, sample_post};

pub async fn post_round_trip(storage: &dyn Storage) {
    let mut new_post = sample_post("Round Trip", "round-trip");
    new_post.excerpt = Some("short summary".to_owned());
    new_post.read_time = 4;

    let created = storage.create_post(new_post).await.unwrap();
    assert_eq!(created.title, "Round Trip");
    assert_eq!(created.slug, "round-trip");
    assert_eq!(created.excerpt.as_deref(), Some("short summary"));
    assert_eq!(created.read_time, 4);
    assert_eq!(created.view_count, 0);
    assert!(!created.is_published);
    assert!(created.published_at.is_none());

    let fetched = storage.get_post(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.title, created.title);
    assert_eq!(fetched.slug, created.slug);
    assert_eq!(fetched.excerpt, created.excerpt);

    let by_slug = storage.get_post_by_slug("round-trip").await.unwrap().unwrap();
    assert_eq!(by_slug.id, created.id);
}

pub async fn duplicate_post_slug_rejected(storage: &dyn Storage) {
    storage
        .create_post(sample_post("First", "shared-slug"))
        .await
        .unwrap();

    let err = storage
        .create_post(sample_post("Second", "shared-slug"))
        .await
        .unwrap_err();
    assert!(err.is_conflict(), "expected conflict, got: {}", err);

    // The failed create must not have written anything.
    let survivor = storage.get_post_by_slug("shared-slug").await.unwrap().unwrap();
    assert_eq!(survivor.title, "First");
}

pub async fn update_post_slug_conflict(storage: &dyn Storage) {
    let first = storage
        .create_post(sample_post("First", "first"))
        .await
        .unwrap();
    let second = storage
        .create_post(sample_post("Second", "second"))
        .await
        .unwrap();

    let err = storage
        .update_post(
            second.id,
            PostUpdate {
                slug: Some("first".to_owned()),
                ..PostUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_conflict(), "expected conflict, got: {}", err);

    // Re-asserting a post's own slug is not a conflict.
    let unchanged = storage
        .update_post(
            first.id,
            PostUpdate {
                slug: Some("first".to_owned()),
                ..PostUpdate::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.slug, "first");
}

pub async fn missing_post_semantics(storage: &dyn Storage) {
    let ghost = Uuid::new_v4();
    assert!(storage.get_post(ghost).await.unwrap().is_none());
    assert!(storage.get_post_by_slug("no-such-slug").await.unwrap().is_none());
    assert!(storage
        .update_post(
            ghost,
            PostUpdate {
                title: Some("anything".to_owned()),
                ..PostUpdate::default()
            }
        )
        .await
        .unwrap()
        .is_none());
    assert!(!storage.delete_post(ghost).await.unwrap());
    assert!(!storage.increment_post_views(ghost).await.unwrap());
}

pub async fn update_merges_partial_fields(storage: &dyn Storage) {
    let created = storage
        .create_post(sample_post("Original", "original"))
        .await
        .unwrap();

    let updated = storage
        .update_post(
            created.id,
            PostUpdate {
                excerpt: Some("added later".to_owned()),
                is_featured: Some(true),
                ..PostUpdate::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    // Untouched fields survive, touched ones change, updated_at moves.
    assert_eq!(updated.title, "Original");
    assert_eq!(updated.slug, "original");
    assert_eq!(updated.excerpt.as_deref(), Some("added later"));
    assert!(updated.is_featured);
    assert!(updated.updated_at >= created.updated_at);
}

pub async fn post_listing_ordering_and_filters(storage: &dyn Storage) {
    let category = storage
        .create_category(sample_category("Filtered", "filtered"))
        .await
        .unwrap();

    let mut oldest = sample_post("Oldest", "oldest");
    oldest.is_published = true;
    oldest.is_featured = true;
    oldest.category_id = Some(category.id);
    let oldest = storage.create_post(oldest).await.unwrap();

    let mut middle = sample_post("Middle", "middle");
    middle.category_id = Some(category.id);
    let middle = storage.create_post(middle).await.unwrap();

    let mut newest = sample_post("Newest", "newest");
    newest.is_published = true;
    let newest = storage.create_post(newest).await.unwrap();

    let all = storage.list_posts(&PostFilter::default()).await.unwrap();
    let ids: Vec<Uuid> = all.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![newest.id, middle.id, oldest.id]);

    let published = storage
        .list_posts(&PostFilter::published_only())
        .await
        .unwrap();
    assert!(published.iter().all(|p| p.is_published));
    assert!(!published.iter().any(|p| p.id == middle.id));

    let in_category = storage
        .list_posts(&PostFilter {
            category_id: Some(category.id),
            ..PostFilter::default()
        })
        .await
        .unwrap();
    let ids: Vec<Uuid> = in_category.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![middle.id, oldest.id]);

    let featured = storage
        .list_posts(&PostFilter {
            featured: Some(true),
            ..PostFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].id, oldest.id);

    let published_in_category = storage
        .list_posts(&PostFilter {
            published: Some(true),
            category_id: Some(category.id),
            ..PostFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(published_in_category.len(), 1);
    assert_eq!(published_in_category[0].id, oldest.id);

    let page = storage
        .list_posts(&PostFilter {
            pagination: PaginationParams::new(1, 1),
            ..PostFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, middle.id);
}

pub async fn view_counter_is_atomic_per_call(storage: &dyn Storage) {
    let post = storage
        .create_post(sample_post("Counted", "counted"))
        .await
        .unwrap();

    for _ in 0..3 {
        assert!(storage.increment_post_views(post.id).await.unwrap());
    }
    let fetched = storage.get_post(post.id).await.unwrap().unwrap();
    assert_eq!(fetched.view_count, 3);
}

pub async fn category_round_trip_and_name_ordering(storage: &dyn Storage) {
    let zebra = storage
        .create_category(sample_category("Zebra", "zebra"))
        .await
        .unwrap();
    let apple = storage
        .create_category(sample_category("Apple", "apple"))
        .await
        .unwrap();

    let fetched = storage.get_category(apple.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Apple");
    let by_slug = storage.get_category_by_slug("zebra").await.unwrap().unwrap();
    assert_eq!(by_slug.id, zebra.id);

    let names: Vec<String> = storage
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Apple".to_owned(), "Zebra".to_owned()]);
}

pub async fn duplicate_category_slug_rejected(storage: &dyn Storage) {
    storage
        .create_category(sample_category("Tools", "tools"))
        .await
        .unwrap();
    let err = storage
        .create_category(sample_category("Tooling", "tools"))
        .await
        .unwrap_err();
    assert!(err.is_conflict(), "expected conflict, got: {}", err);

    let other = storage
        .create_category(sample_category("Guides", "guides"))
        .await
        .unwrap();
    let err = storage
        .update_category(
            other.id,
            CategoryUpdate {
                slug: Some("tools".to_owned()),
                ..CategoryUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_conflict(), "expected conflict, got: {}", err);
}

pub async fn category_delete_semantics(storage: &dyn Storage) {
    let category = storage
        .create_category(sample_category("Ephemeral", "ephemeral"))
        .await
        .unwrap();
    assert!(storage.delete_category(category.id).await.unwrap());
    assert!(storage.get_category(category.id).await.unwrap().is_none());
    assert!(!storage.delete_category(category.id).await.unwrap());

    assert!(storage
        .update_category(Uuid::new_v4(), CategoryUpdate::default())
        .await
        .unwrap()
        .is_none());
}

pub async fn post_counting_per_category(storage: &dyn Storage) {
    let category = storage
        .create_category(sample_category("Busy", "busy"))
        .await
        .unwrap();
    assert_eq!(
        storage.count_posts_in_category(category.id).await.unwrap(),
        0
    );

    let mut post = sample_post("In Busy", "in-busy");
    post.category_id = Some(category.id);
    let post = storage.create_post(post).await.unwrap();
    assert_eq!(
        storage.count_posts_in_category(category.id).await.unwrap(),
        1
    );

    storage.delete_post(post.id).await.unwrap();
    assert_eq!(
        storage.count_posts_in_category(category.id).await.unwrap(),
        0
    );
}

pub async fn media_scoped_listing(storage: &dyn Storage) {
    let post = storage
        .create_post(sample_post("Host", "host"))
        .await
        .unwrap();

    let attached_first = storage
        .create_media(sample_media("a.png", Some(post.id)))
        .await
        .unwrap();
    let unattached = storage
        .create_media(sample_media("b.png", None))
        .await
        .unwrap();
    let attached_second = storage
        .create_media(sample_media("c.png", Some(post.id)))
        .await
        .unwrap();

    let all = storage.list_media(None).await.unwrap();
    let ids: Vec<Uuid> = all.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![attached_second.id, unattached.id, attached_first.id]);

    let scoped = storage.list_media(Some(post.id)).await.unwrap();
    let ids: Vec<Uuid> = scoped.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![attached_second.id, attached_first.id]);

    let updated = storage
        .update_media(
            unattached.id,
            MediaUpdate {
                alt_text: Some("decorative".to_owned()),
                ..MediaUpdate::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.alt_text.as_deref(), Some("decorative"));

    assert!(storage.delete_media(unattached.id).await.unwrap());
    assert!(storage.get_media(unattached.id).await.unwrap().is_none());
    assert!(!storage.delete_media(unattached.id).await.unwrap());
}

pub async fn affiliate_click_increments(storage: &dyn Storage) {
    let link = storage
        .create_affiliate_link(NewAffiliateLink {
            post_id: None,
            title: "Great Widget".to_owned(),
            url: "https://example.com/widget".to_owned(),
            description: None,
            position_in_content: Some(2),
        })
        .await
        .unwrap();
    assert_eq!(link.click_count, 0);

    for _ in 0..3 {
        assert!(storage.increment_affiliate_click(link.id).await.unwrap());
    }
    let fetched = storage.get_affiliate_link(link.id).await.unwrap().unwrap();
    assert_eq!(fetched.click_count, 3);

    assert!(!storage
        .increment_affiliate_click(Uuid::new_v4())
        .await
        .unwrap());
}

pub async fn cta_click_increments(storage: &dyn Storage) {
    let cta = storage
        .create_call_to_action(NewCallToAction {
            post_id: None,
            title: "Subscribe".to_owned(),
            content: None,
            button_text: "Join".to_owned(),
            button_url: "https://example.com/join".to_owned(),
            position_in_content: None,
        })
        .await
        .unwrap();
    assert_eq!(cta.click_count, 0);

    assert!(storage.increment_cta_click(cta.id).await.unwrap());
    assert!(storage.increment_cta_click(cta.id).await.unwrap());
    let fetched = storage.get_call_to_action(cta.id).await.unwrap().unwrap();
    assert_eq!(fetched.click_count, 2);
}

pub async fn events_are_append_only_and_ordered(storage: &dyn Storage) {
    for n in 1..=3 {
        storage
            .create_event(NewAnalyticsEvent {
                event_type: "page_view".to_owned(),
                event_data: Some(serde_json::json!({ "n": n })),
                post_id: None,
                user_agent: Some("contract-suite".to_owned()),
                ip_address: None,
            })
            .await
            .unwrap();
    }

    let events = storage.list_events(10).await.unwrap();
    assert_eq!(events.len(), 3);
    let ns: Vec<i64> = events
        .iter()
        .map(|e| e.event_data.as_ref().unwrap()["n"].as_i64().unwrap())
        .collect();
    assert_eq!(ns, vec![3, 2, 1]);

    let limited = storage.list_events(2).await.unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].event_data.as_ref().unwrap()["n"], 3);
}

pub async fn settings_upsert_in_place(storage: &dyn Storage) {
    assert!(storage.get_setting("site_title").await.unwrap().is_none());

    let created = storage
        .upsert_setting("site_title", "My Blog")
        .await
        .unwrap();
    assert_eq!(created.value, "My Blog");

    let updated = storage
        .upsert_setting("site_title", "My Better Blog")
        .await
        .unwrap();
    assert_eq!(updated.value, "My Better Blog");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let settings = storage.list_settings().await.unwrap();
    assert_eq!(settings.len(), 1);

    let fetched = storage.get_setting("site_title").await.unwrap().unwrap();
    assert_eq!(fetched.value, "My Better Blog");
}

pub async fn usernames_are_unique(storage: &dyn Storage) {
    let user = storage
        .create_user(NewUser {
            username: "admin".to_owned(),
            password_hash: "!".to_owned(),
        })
        .await
        .unwrap();

    let fetched = storage.get_user_by_username("admin").await.unwrap().unwrap();
    assert_eq!(fetched.id, user.id);
    let by_id = storage.get_user(user.id).await.unwrap().unwrap();
    assert_eq!(by_id.username, "admin");

    let err = storage
        .create_user(NewUser {
            username: "admin".to_owned(),
            password_hash: "!".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
}
