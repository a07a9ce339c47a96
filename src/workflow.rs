//! Business rules applied on top of raw storage operations: slug
//! derivation, category resolution, read-time computation, SEO mirror
//! defaults and the draft/published lifecycle.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::*;
use crate::storage::{PostFilter, Storage};
use crate::utils::{estimate_read_time, slugify};

/// Orchestrates content operations over an injected storage backend.
///
/// Construct one per process and share it; it holds no state beyond the
/// backend handle and the fallback author identity.
#[derive(Clone)]
pub struct ContentWorkflow {
    storage: Arc<dyn Storage>,
    default_author: String,
}

impl ContentWorkflow {
    pub fn new(storage: Arc<dyn Storage>, default_author: impl Into<String>) -> Self {
        Self {
            storage,
            default_author: default_author.into(),
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Creates a post from raw field values.
    ///
    /// Title and content are required. The slug is derived from the title
    /// unless explicitly supplied; an existing slug is a conflict, never an
    /// automatic rename. A stale category reference falls back to the first
    /// available category rather than failing the whole creation.
    pub async fn create_post(&self, draft: PostDraft) -> Result<PostWithCategory> {
        if draft.title.trim().is_empty() {
            return Err(Error::validation("title is required"));
        }
        if draft.content.trim().is_empty() {
            return Err(Error::validation("content is required"));
        }

        let slug = slugify(draft.slug.as_deref().unwrap_or(&draft.title));
        if slug.is_empty() {
            return Err(Error::validation("title does not produce a usable slug"));
        }
        if self.storage.get_post_by_slug(&slug).await?.is_some() {
            return Err(Error::slug_taken(&slug));
        }

        let category_id = self.resolve_category(draft.category_id).await?;

        let is_published = draft.is_published.unwrap_or(false);
        let published_at = draft
            .published_at
            .or_else(|| is_published.then(Utc::now));

        let read_time = draft
            .read_time
            .unwrap_or_else(|| estimate_read_time(&draft.content));

        let new_post = NewPost {
            meta_title: draft.meta_title.or_else(|| Some(draft.title.clone())),
            meta_description: draft.meta_description.or_else(|| draft.excerpt.clone()),
            og_title: draft.og_title.or_else(|| Some(draft.title.clone())),
            og_description: draft.og_description.or_else(|| draft.excerpt.clone()),
            og_image: draft.og_image.or_else(|| draft.featured_image.clone()),
            author_name: draft
                .author_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| self.default_author.clone()),
            position: draft.position.unwrap_or_else(|| "recent".to_owned()),
            title: draft.title,
            slug,
            content: draft.content,
            excerpt: draft.excerpt,
            featured_image: draft.featured_image,
            category_id,
            is_published,
            is_featured: draft.is_featured.unwrap_or(false),
            published_at,
            read_time,
        };

        let post = self.storage.create_post(new_post).await?;
        info!(post_id = %post.id, slug = %post.slug, "created post");
        self.with_category(post).await
    }

    /// Applies a partial update to a post.
    ///
    /// Derived fields follow the touched primaries: a changed title
    /// re-derives the slug unless one is supplied, changed content
    /// recomputes the read time unless one is supplied. The first
    /// false→true publish transition stamps `published_at`; re-publishing
    /// does not re-stamp and unpublishing does not clear it.
    pub async fn update_post(
        &self,
        id: Uuid,
        mut update: PostUpdate,
    ) -> Result<Option<PostWithCategory>> {
        let Some(existing) = self.storage.get_post(id).await? else {
            return Ok(None);
        };

        if let Some(title) = &update.title {
            if title.trim().is_empty() {
                return Err(Error::validation("title cannot be empty"));
            }
        }
        if let Some(content) = &update.content {
            if content.trim().is_empty() {
                return Err(Error::validation("content cannot be empty"));
            }
        }

        if let Some(supplied) = update.slug.take() {
            let slug = slugify(&supplied);
            if slug.is_empty() {
                return Err(Error::validation("slug cannot be empty"));
            }
            update.slug = Some(slug);
        } else if let Some(title) = &update.title {
            let derived = slugify(title);
            if derived.is_empty() {
                return Err(Error::validation("title does not produce a usable slug"));
            }
            if derived != existing.slug {
                update.slug = Some(derived);
            }
        }
        if let Some(slug) = &update.slug {
            if *slug != existing.slug {
                if let Some(other) = self.storage.get_post_by_slug(slug).await? {
                    if other.id != id {
                        return Err(Error::slug_taken(slug));
                    }
                }
            }
        }

        if let Some(category_id) = update.category_id {
            update.category_id = self.resolve_category(Some(category_id)).await?;
        }

        if update.content.is_some() && update.read_time.is_none() {
            let content = update.content.as_deref().unwrap_or_default();
            update.read_time = Some(estimate_read_time(content));
        }

        if update.is_published == Some(true)
            && !existing.is_published
            && update.published_at.is_none()
        {
            update.published_at = Some(Utc::now());
            info!(post_id = %id, "publishing post for the first time");
        }

        match self.storage.update_post(id, update).await? {
            Some(post) => Ok(Some(self.with_category(post).await?)),
            None => Ok(None),
        }
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Option<PostWithCategory>> {
        match self.storage.get_post(id).await? {
            Some(post) => Ok(Some(self.with_category(post).await?)),
            None => Ok(None),
        }
    }

    pub async fn get_post_by_slug(&self, slug: &str) -> Result<Option<PostWithCategory>> {
        match self.storage.get_post_by_slug(slug).await? {
            Some(post) => Ok(Some(self.with_category(post).await?)),
            None => Ok(None),
        }
    }

    /// Public-facing read path: only published posts are visible, and each
    /// hit bumps the view counter (at-least-once; exactness under
    /// concurrent reads is not required).
    pub async fn view_post(&self, slug: &str) -> Result<Option<PostWithCategory>> {
        let Some(post) = self.storage.get_post_by_slug(slug).await? else {
            return Ok(None);
        };
        if !post.is_published {
            return Ok(None);
        }
        self.storage.increment_post_views(post.id).await?;
        Ok(Some(self.with_category(post).await?))
    }

    pub async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<PostWithCategory>> {
        let posts = self.storage.list_posts(filter).await?;
        let categories: HashMap<Uuid, Category> = self
            .storage
            .list_categories()
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        Ok(posts
            .into_iter()
            .map(|post| {
                let category = post.category_id.and_then(|id| categories.get(&id).cloned());
                PostWithCategory { post, category }
            })
            .collect())
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<bool> {
        self.storage.delete_post(id).await
    }

    pub async fn create_category(&self, draft: CategoryDraft) -> Result<Category> {
        if draft.name.trim().is_empty() {
            return Err(Error::validation("name is required"));
        }
        let slug = slugify(draft.slug.as_deref().unwrap_or(&draft.name));
        if slug.is_empty() {
            return Err(Error::validation("name does not produce a usable slug"));
        }
        if self.storage.get_category_by_slug(&slug).await?.is_some() {
            return Err(Error::slug_taken(&slug));
        }
        self.storage
            .create_category(NewCategory {
                name: draft.name,
                slug,
                description: draft.description,
                color: draft.color,
            })
            .await
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        mut update: CategoryUpdate,
    ) -> Result<Option<Category>> {
        let Some(existing) = self.storage.get_category(id).await? else {
            return Ok(None);
        };
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(Error::validation("name cannot be empty"));
            }
        }
        if let Some(supplied) = update.slug.take() {
            let slug = slugify(&supplied);
            if slug.is_empty() {
                return Err(Error::validation("slug cannot be empty"));
            }
            update.slug = Some(slug);
        } else if let Some(name) = &update.name {
            let derived = slugify(name);
            if derived.is_empty() {
                return Err(Error::validation("name does not produce a usable slug"));
            }
            if derived != existing.slug {
                update.slug = Some(derived);
            }
        }
        if let Some(slug) = &update.slug {
            if *slug != existing.slug {
                if let Some(other) = self.storage.get_category_by_slug(slug).await? {
                    if other.id != id {
                        return Err(Error::slug_taken(slug));
                    }
                }
            }
        }
        self.storage.update_category(id, update).await
    }

    pub async fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        self.storage.get_category(id).await
    }

    pub async fn get_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        self.storage.get_category_by_slug(slug).await
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.storage.list_categories().await
    }

    /// Deletes a category, refusing while any post still references it.
    /// The guard is a business rule checked here, not a database cascade.
    pub async fn delete_category(&self, id: Uuid) -> Result<bool> {
        let posts = self.storage.count_posts_in_category(id).await?;
        if posts > 0 {
            return Err(Error::CategoryInUse { id, posts });
        }
        self.storage.delete_category(id).await
    }

    pub async fn add_media(&self, media: NewMedia) -> Result<Media> {
        if media.file_name.trim().is_empty() {
            return Err(Error::validation("file_name is required"));
        }
        if media.file_type.trim().is_empty() {
            return Err(Error::validation("file_type is required"));
        }
        if media.file_url.trim().is_empty() {
            return Err(Error::validation("file_url is required"));
        }
        self.storage.create_media(media).await
    }

    pub async fn get_media(&self, id: Uuid) -> Result<Option<Media>> {
        self.storage.get_media(id).await
    }

    pub async fn list_media(&self, post_id: Option<Uuid>) -> Result<Vec<Media>> {
        self.storage.list_media(post_id).await
    }

    pub async fn update_media(&self, id: Uuid, update: MediaUpdate) -> Result<Option<Media>> {
        self.storage.update_media(id, update).await
    }

    pub async fn delete_media(&self, id: Uuid) -> Result<bool> {
        self.storage.delete_media(id).await
    }

    pub async fn create_affiliate_link(&self, link: NewAffiliateLink) -> Result<AffiliateLink> {
        if link.title.trim().is_empty() {
            return Err(Error::validation("title is required"));
        }
        if link.url.trim().is_empty() {
            return Err(Error::validation("url is required"));
        }
        self.storage.create_affiliate_link(link).await
    }

    pub async fn get_affiliate_link(&self, id: Uuid) -> Result<Option<AffiliateLink>> {
        self.storage.get_affiliate_link(id).await
    }

    pub async fn list_affiliate_links(&self, post_id: Option<Uuid>) -> Result<Vec<AffiliateLink>> {
        self.storage.list_affiliate_links(post_id).await
    }

    pub async fn update_affiliate_link(
        &self,
        id: Uuid,
        update: AffiliateLinkUpdate,
    ) -> Result<Option<AffiliateLink>> {
        self.storage.update_affiliate_link(id, update).await
    }

    pub async fn delete_affiliate_link(&self, id: Uuid) -> Result<bool> {
        self.storage.delete_affiliate_link(id).await
    }

    /// Records an external click on an affiliate link.
    pub async fn record_affiliate_click(&self, id: Uuid) -> Result<bool> {
        self.storage.increment_affiliate_click(id).await
    }

    pub async fn create_call_to_action(&self, cta: NewCallToAction) -> Result<CallToAction> {
        if cta.title.trim().is_empty() {
            return Err(Error::validation("title is required"));
        }
        if cta.button_text.trim().is_empty() {
            return Err(Error::validation("button_text is required"));
        }
        if cta.button_url.trim().is_empty() {
            return Err(Error::validation("button_url is required"));
        }
        self.storage.create_call_to_action(cta).await
    }

    pub async fn get_call_to_action(&self, id: Uuid) -> Result<Option<CallToAction>> {
        self.storage.get_call_to_action(id).await
    }

    pub async fn list_call_to_actions(&self, post_id: Option<Uuid>) -> Result<Vec<CallToAction>> {
        self.storage.list_call_to_actions(post_id).await
    }

    pub async fn update_call_to_action(
        &self,
        id: Uuid,
        update: CallToActionUpdate,
    ) -> Result<Option<CallToAction>> {
        self.storage.update_call_to_action(id, update).await
    }

    pub async fn delete_call_to_action(&self, id: Uuid) -> Result<bool> {
        self.storage.delete_call_to_action(id).await
    }

    pub async fn record_cta_click(&self, id: Uuid) -> Result<bool> {
        self.storage.increment_cta_click(id).await
    }

    /// Captures an analytics event. Fire-and-forget: the only outcomes are
    /// accepted or rejected-as-malformed.
    pub async fn record_event(&self, event: NewAnalyticsEvent) -> Result<AnalyticsEvent> {
        if event.event_type.trim().is_empty() {
            return Err(Error::validation("event_type is required"));
        }
        self.storage.create_event(event).await
    }

    pub async fn list_events(&self, limit: u32) -> Result<Vec<AnalyticsEvent>> {
        self.storage.list_events(limit).await
    }

    pub async fn get_setting(&self, key: &str) -> Result<Option<SiteSetting>> {
        self.storage.get_setting(key).await
    }

    pub async fn list_settings(&self) -> Result<Vec<SiteSetting>> {
        self.storage.list_settings().await
    }

    pub async fn set_setting(&self, key: &str, value: &str) -> Result<SiteSetting> {
        if key.trim().is_empty() {
            return Err(Error::validation("key is required"));
        }
        self.storage.upsert_setting(key, value).await
    }

    /// Resolves a submitted category reference. An unknown id falls back to
    /// the first available category so a stale reference cannot make a post
    /// unpublishable; with no categories at all the post is left
    /// uncategorized.
    async fn resolve_category(&self, category_id: Option<Uuid>) -> Result<Option<Uuid>> {
        let Some(id) = category_id else {
            return Ok(None);
        };
        if self.storage.get_category(id).await?.is_some() {
            return Ok(Some(id));
        }
        let fallback = self.storage.list_categories().await?.into_iter().next();
        match fallback {
            Some(category) => {
                warn!(
                    submitted = %id,
                    fallback = %category.id,
                    "unknown category reference, falling back to first category"
                );
                Ok(Some(category.id))
            }
            None => {
                warn!(submitted = %id, "unknown category reference and no categories exist");
                Ok(None)
            }
        }
    }

    async fn with_category(&self, post: Post) -> Result<PostWithCategory> {
        let category = match post.category_id {
            Some(id) => self.storage.get_category(id).await?,
            None => None,
        };
        Ok(PostWithCategory { post, category })
    }
}
