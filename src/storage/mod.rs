//! The storage capability contract and its backends.
//!
//! Every backend must satisfy the [`Storage`] trait identically: same
//! ordering, same uniqueness rejections, same absent-vs-found semantics.
//! The shared contract test suite under `tests/` runs against both.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::*;
use crate::utils::PaginationParams;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PostgresStorage;

/// Conjunctive filter for post listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostFilter {
    pub published: Option<bool>,
    pub category_id: Option<Uuid>,
    pub featured: Option<bool>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl PostFilter {
    pub fn published_only() -> Self {
        Self {
            published: Some(true),
            ..Self::default()
        }
    }
}

/// Data persistence contract implemented by every backend.
///
/// `create_*` assigns the id and timestamps. `update_*` merges partial
/// fields and refreshes `updated_at`, returning `None` for a missing id.
/// `delete_*` returns whether a matching record existed. Slug uniqueness
/// for posts and categories is enforced inside create/update.
#[async_trait]
pub trait Storage: Send + Sync {
    // Posts
    async fn create_post(&self, post: NewPost) -> Result<Post>;
    async fn get_post(&self, id: Uuid) -> Result<Option<Post>>;
    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>>;
    /// Default ordering is descending by creation time.
    async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<Post>>;
    async fn update_post(&self, id: Uuid, update: PostUpdate) -> Result<Option<Post>>;
    async fn delete_post(&self, id: Uuid) -> Result<bool>;
    /// Bumps the view counter in a single atomic update.
    async fn increment_post_views(&self, id: Uuid) -> Result<bool>;
    async fn count_posts_in_category(&self, category_id: Uuid) -> Result<i64>;

    // Categories
    async fn create_category(&self, category: NewCategory) -> Result<Category>;
    async fn get_category(&self, id: Uuid) -> Result<Option<Category>>;
    async fn get_category_by_slug(&self, slug: &str) -> Result<Option<Category>>;
    /// Ordered ascending by name.
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn update_category(&self, id: Uuid, update: CategoryUpdate) -> Result<Option<Category>>;
    async fn delete_category(&self, id: Uuid) -> Result<bool>;

    // Media
    async fn create_media(&self, media: NewMedia) -> Result<Media>;
    async fn get_media(&self, id: Uuid) -> Result<Option<Media>>;
    /// Ordered descending by creation time, optionally scoped to a post.
    async fn list_media(&self, post_id: Option<Uuid>) -> Result<Vec<Media>>;
    async fn update_media(&self, id: Uuid, update: MediaUpdate) -> Result<Option<Media>>;
    async fn delete_media(&self, id: Uuid) -> Result<bool>;

    // Affiliate links
    async fn create_affiliate_link(&self, link: NewAffiliateLink) -> Result<AffiliateLink>;
    async fn get_affiliate_link(&self, id: Uuid) -> Result<Option<AffiliateLink>>;
    async fn list_affiliate_links(&self, post_id: Option<Uuid>) -> Result<Vec<AffiliateLink>>;
    async fn update_affiliate_link(
        &self,
        id: Uuid,
        update: AffiliateLinkUpdate,
    ) -> Result<Option<AffiliateLink>>;
    async fn delete_affiliate_link(&self, id: Uuid) -> Result<bool>;
    async fn increment_affiliate_click(&self, id: Uuid) -> Result<bool>;

    // Call-to-action blocks
    async fn create_call_to_action(&self, cta: NewCallToAction) -> Result<CallToAction>;
    async fn get_call_to_action(&self, id: Uuid) -> Result<Option<CallToAction>>;
    async fn list_call_to_actions(&self, post_id: Option<Uuid>) -> Result<Vec<CallToAction>>;
    async fn update_call_to_action(
        &self,
        id: Uuid,
        update: CallToActionUpdate,
    ) -> Result<Option<CallToAction>>;
    async fn delete_call_to_action(&self, id: Uuid) -> Result<bool>;
    async fn increment_cta_click(&self, id: Uuid) -> Result<bool>;

    // Analytics events (append-only)
    async fn create_event(&self, event: NewAnalyticsEvent) -> Result<AnalyticsEvent>;
    /// Most recent first.
    async fn list_events(&self, limit: u32) -> Result<Vec<AnalyticsEvent>>;

    // Site settings
    async fn get_setting(&self, key: &str) -> Result<Option<SiteSetting>>;
    async fn list_settings(&self) -> Result<Vec<SiteSetting>>;
    /// Inserts a new key or updates an existing one in place, bumping
    /// `updated_at`.
    async fn upsert_setting(&self, key: &str, value: &str) -> Result<SiteSetting>;

    // Users
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
}

/// Builds the configured backend once at startup. The result is passed
/// explicitly to the workflow layer; there is no global instance.
pub async fn connect(config: &Config) -> Result<Arc<dyn Storage>> {
    match config.storage_backend.as_str() {
        "memory" => {
            tracing::info!("using in-memory storage backend");
            Ok(Arc::new(MemoryStorage::new()))
        }
        "postgres" => {
            let storage = PostgresStorage::connect(&config.database_url).await?;
            tracing::info!("connected to postgres storage backend");
            Ok(Arc::new(storage))
        }
        other => Err(Error::validation(format!(
            "unknown storage backend: {}",
            other
        ))),
    }
}
