//! One-time bootstrap seeding.
//!
//! Runs through the `Storage` trait so both backends are seeded
//! identically, and is idempotent: every record is looked up by its
//! natural key (slug, username) before being created, so it can safely be
//! run multiple times.

use std::sync::Arc;
use tracing::info;

use crate::error::Result;
use crate::models::{NewAnalyticsEvent, NewCategory, NewUser, PostDraft};
use crate::storage::Storage;
use crate::utils::slugify;
use crate::workflow::ContentWorkflow;

const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Tools", "tools", "Hands-on reviews of tools we actually use."),
    ("Guides", "guides", "Step-by-step walkthroughs and how-tos."),
    ("News", "news", "Product updates and industry notes."),
];

/// Ensures default categories and the admin user exist; optionally seeds a
/// small batch of demo posts and analytics events.
pub async fn seed(
    storage: Arc<dyn Storage>,
    admin_username: &str,
    demo_content: bool,
) -> Result<()> {
    info!("seeding categories");
    for (name, slug, description) in DEFAULT_CATEGORIES {
        if storage.get_category_by_slug(slug).await?.is_some() {
            continue;
        }
        let category = storage
            .create_category(NewCategory {
                name: (*name).to_owned(),
                slug: (*slug).to_owned(),
                description: Some((*description).to_owned()),
                color: None,
            })
            .await?;
        info!(category_id = %category.id, slug = %category.slug, "seeded category");
    }

    if storage.get_user_by_username(admin_username).await?.is_none() {
        let user = storage
            .create_user(NewUser {
                username: admin_username.to_owned(),
                // Placeholder hash; credential management happens outside
                // this crate.
                password_hash: "!".to_owned(),
            })
            .await?;
        info!(user_id = %user.id, username = %user.username, "seeded admin user");
    }

    if demo_content {
        seed_demo_content(storage, admin_username).await?;
    }

    info!("seeding completed");
    Ok(())
}

/// Demo posts go through the workflow so they get the same slug, read-time
/// and SEO treatment real ones do.
async fn seed_demo_content(storage: Arc<dyn Storage>, author: &str) -> Result<()> {
    let workflow = ContentWorkflow::new(storage.clone(), author);

    let samples = [
        (
            "Welcome to the Blog",
            "This is a sample post created by the bootstrap seeder. Replace it \
             with real content from the admin panel.",
            "tools",
            true,
        ),
        (
            "Drafting Your First Guide",
            "Drafts stay private until published. This sample stays in draft \
             state so the admin panel has one of each to show.",
            "guides",
            false,
        ),
    ];

    for (title, content, category_slug, publish) in samples {
        if storage.get_post_by_slug(&slugify(title)).await?.is_some() {
            continue;
        }
        let category_id = storage
            .get_category_by_slug(category_slug)
            .await?
            .map(|c| c.id);
        let created = workflow
            .create_post(PostDraft {
                title: title.to_owned(),
                content: content.to_owned(),
                category_id,
                is_published: Some(publish),
                ..PostDraft::default()
            })
            .await?;
        info!(post_id = %created.post.id, slug = %created.post.slug, "seeded demo post");

        storage
            .create_event(NewAnalyticsEvent {
                event_type: "page_view".to_owned(),
                event_data: Some(serde_json::json!({ "source": "seeder" })),
                post_id: Some(created.post.id),
                user_agent: None,
                ip_address: None,
            })
            .await?;
    }

    Ok(())
}
