//! Array-backed storage for ephemeral and dev operation.
//!
//! All tables live behind one `RwLock`, so a uniqueness pre-check and the
//! insert that follows it form a single critical section. State is scoped
//! to the process; nothing survives a restart.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{PostFilter, Storage};
use crate::error::{Error, Result};
use crate::models::*;

use std::sync::RwLock;

#[derive(Default)]
struct Tables {
    posts: Vec<Post>,
    categories: Vec<Category>,
    media: Vec<Media>,
    affiliate_links: Vec<AffiliateLink>,
    call_to_actions: Vec<CallToAction>,
    events: Vec<AnalyticsEvent>,
    settings: Vec<SiteSetting>,
    users: Vec<User>,
}

pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        if tables.posts.iter().any(|p| p.slug == post.slug) {
            return Err(Error::slug_taken(&post.slug));
        }
        let now = Utc::now();
        let record = Post {
            id: Uuid::new_v4(),
            title: post.title,
            slug: post.slug,
            content: post.content,
            excerpt: post.excerpt,
            featured_image: post.featured_image,
            category_id: post.category_id,
            author_name: post.author_name,
            is_published: post.is_published,
            is_featured: post.is_featured,
            position: post.position,
            published_at: post.published_at,
            read_time: post.read_time,
            view_count: 0,
            meta_title: post.meta_title,
            meta_description: post.meta_description,
            og_title: post.og_title,
            og_description: post.og_description,
            og_image: post.og_image,
            created_at: now,
            updated_at: now,
        };
        tables.posts.push(record.clone());
        Ok(record)
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
        let tables = self.tables.read().expect("storage lock poisoned");
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let tables = self.tables.read().expect("storage lock poisoned");
        Ok(tables.posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<Post>> {
        let tables = self.tables.read().expect("storage lock poisoned");
        // Reverse insertion order first so equal timestamps stay newest-first.
        let mut posts: Vec<Post> = tables
            .posts
            .iter()
            .rev()
            .filter(|p| {
                filter.published.map_or(true, |v| p.is_published == v)
                    && filter.category_id.map_or(true, |v| p.category_id == Some(v))
                    && filter.featured.map_or(true, |v| p.is_featured == v)
            })
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts
            .into_iter()
            .skip(filter.pagination.offset() as usize)
            .take(filter.pagination.limit() as usize)
            .collect())
    }

    async fn update_post(&self, id: Uuid, update: PostUpdate) -> Result<Option<Post>> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        if !tables.posts.iter().any(|p| p.id == id) {
            return Ok(None);
        }
        if let Some(slug) = &update.slug {
            if tables.posts.iter().any(|p| p.slug == *slug && p.id != id) {
                return Err(Error::slug_taken(slug));
            }
        }
        let Some(post) = tables.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(title) = update.title {
            post.title = title;
        }
        if let Some(slug) = update.slug {
            post.slug = slug;
        }
        if let Some(content) = update.content {
            post.content = content;
        }
        if let Some(excerpt) = update.excerpt {
            post.excerpt = Some(excerpt);
        }
        if let Some(featured_image) = update.featured_image {
            post.featured_image = Some(featured_image);
        }
        if let Some(category_id) = update.category_id {
            post.category_id = Some(category_id);
        }
        if let Some(author_name) = update.author_name {
            post.author_name = author_name;
        }
        if let Some(is_published) = update.is_published {
            post.is_published = is_published;
        }
        if let Some(is_featured) = update.is_featured {
            post.is_featured = is_featured;
        }
        if let Some(position) = update.position {
            post.position = position;
        }
        if let Some(published_at) = update.published_at {
            post.published_at = Some(published_at);
        }
        if let Some(read_time) = update.read_time {
            post.read_time = read_time;
        }
        if let Some(meta_title) = update.meta_title {
            post.meta_title = Some(meta_title);
        }
        if let Some(meta_description) = update.meta_description {
            post.meta_description = Some(meta_description);
        }
        if let Some(og_title) = update.og_title {
            post.og_title = Some(og_title);
        }
        if let Some(og_description) = update.og_description {
            post.og_description = Some(og_description);
        }
        if let Some(og_image) = update.og_image {
            post.og_image = Some(og_image);
        }
        post.updated_at = Utc::now();
        Ok(Some(post.clone()))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        Ok(tables.posts.len() < before)
    }

    async fn increment_post_views(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        match tables.posts.iter_mut().find(|p| p.id == id) {
            Some(post) => {
                post.view_count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_posts_in_category(&self, category_id: Uuid) -> Result<i64> {
        let tables = self.tables.read().expect("storage lock poisoned");
        Ok(tables
            .posts
            .iter()
            .filter(|p| p.category_id == Some(category_id))
            .count() as i64)
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        if tables.categories.iter().any(|c| c.slug == category.slug) {
            return Err(Error::slug_taken(&category.slug));
        }
        let now = Utc::now();
        let record = Category {
            id: Uuid::new_v4(),
            name: category.name,
            slug: category.slug,
            description: category.description,
            color: category.color,
            created_at: now,
            updated_at: now,
        };
        tables.categories.push(record.clone());
        Ok(record)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        let tables = self.tables.read().expect("storage lock poisoned");
        Ok(tables.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn get_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let tables = self.tables.read().expect("storage lock poisoned");
        Ok(tables.categories.iter().find(|c| c.slug == slug).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let tables = self.tables.read().expect("storage lock poisoned");
        let mut categories = tables.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn update_category(&self, id: Uuid, update: CategoryUpdate) -> Result<Option<Category>> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        if !tables.categories.iter().any(|c| c.id == id) {
            return Ok(None);
        }
        if let Some(slug) = &update.slug {
            if tables.categories.iter().any(|c| c.slug == *slug && c.id != id) {
                return Err(Error::slug_taken(slug));
            }
        }
        let Some(category) = tables.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = update.name {
            category.name = name;
        }
        if let Some(slug) = update.slug {
            category.slug = slug;
        }
        if let Some(description) = update.description {
            category.description = Some(description);
        }
        if let Some(color) = update.color {
            category.color = Some(color);
        }
        category.updated_at = Utc::now();
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        let before = tables.categories.len();
        tables.categories.retain(|c| c.id != id);
        Ok(tables.categories.len() < before)
    }

    async fn create_media(&self, media: NewMedia) -> Result<Media> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        let record = Media {
            id: Uuid::new_v4(),
            file_name: media.file_name,
            file_type: media.file_type,
            file_url: media.file_url,
            file_size: media.file_size,
            alt_text: media.alt_text,
            caption: media.caption,
            post_id: media.post_id,
            position_in_content: media.position_in_content,
            created_at: Utc::now(),
        };
        tables.media.push(record.clone());
        Ok(record)
    }

    async fn get_media(&self, id: Uuid) -> Result<Option<Media>> {
        let tables = self.tables.read().expect("storage lock poisoned");
        Ok(tables.media.iter().find(|m| m.id == id).cloned())
    }

    async fn list_media(&self, post_id: Option<Uuid>) -> Result<Vec<Media>> {
        let tables = self.tables.read().expect("storage lock poisoned");
        let mut media: Vec<Media> = tables
            .media
            .iter()
            .rev()
            .filter(|m| post_id.map_or(true, |v| m.post_id == Some(v)))
            .cloned()
            .collect();
        media.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(media)
    }

    async fn update_media(&self, id: Uuid, update: MediaUpdate) -> Result<Option<Media>> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        let Some(media) = tables.media.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        if let Some(alt_text) = update.alt_text {
            media.alt_text = Some(alt_text);
        }
        if let Some(caption) = update.caption {
            media.caption = Some(caption);
        }
        if let Some(post_id) = update.post_id {
            media.post_id = Some(post_id);
        }
        if let Some(position) = update.position_in_content {
            media.position_in_content = Some(position);
        }
        Ok(Some(media.clone()))
    }

    async fn delete_media(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        let before = tables.media.len();
        tables.media.retain(|m| m.id != id);
        Ok(tables.media.len() < before)
    }

    async fn create_affiliate_link(&self, link: NewAffiliateLink) -> Result<AffiliateLink> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        let now = Utc::now();
        let record = AffiliateLink {
            id: Uuid::new_v4(),
            post_id: link.post_id,
            title: link.title,
            url: link.url,
            description: link.description,
            position_in_content: link.position_in_content,
            click_count: 0,
            created_at: now,
            updated_at: now,
        };
        tables.affiliate_links.push(record.clone());
        Ok(record)
    }

    async fn get_affiliate_link(&self, id: Uuid) -> Result<Option<AffiliateLink>> {
        let tables = self.tables.read().expect("storage lock poisoned");
        Ok(tables.affiliate_links.iter().find(|l| l.id == id).cloned())
    }

    async fn list_affiliate_links(&self, post_id: Option<Uuid>) -> Result<Vec<AffiliateLink>> {
        let tables = self.tables.read().expect("storage lock poisoned");
        let mut links: Vec<AffiliateLink> = tables
            .affiliate_links
            .iter()
            .rev()
            .filter(|l| post_id.map_or(true, |v| l.post_id == Some(v)))
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(links)
    }

    async fn update_affiliate_link(
        &self,
        id: Uuid,
        update: AffiliateLinkUpdate,
    ) -> Result<Option<AffiliateLink>> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        let Some(link) = tables.affiliate_links.iter_mut().find(|l| l.id == id) else {
            return Ok(None);
        };
        if let Some(post_id) = update.post_id {
            link.post_id = Some(post_id);
        }
        if let Some(title) = update.title {
            link.title = title;
        }
        if let Some(url) = update.url {
            link.url = url;
        }
        if let Some(description) = update.description {
            link.description = Some(description);
        }
        if let Some(position) = update.position_in_content {
            link.position_in_content = Some(position);
        }
        link.updated_at = Utc::now();
        Ok(Some(link.clone()))
    }

    async fn delete_affiliate_link(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        let before = tables.affiliate_links.len();
        tables.affiliate_links.retain(|l| l.id != id);
        Ok(tables.affiliate_links.len() < before)
    }

    async fn increment_affiliate_click(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        match tables.affiliate_links.iter_mut().find(|l| l.id == id) {
            Some(link) => {
                link.click_count += 1;
                link.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn create_call_to_action(&self, cta: NewCallToAction) -> Result<CallToAction> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        let now = Utc::now();
        let record = CallToAction {
            id: Uuid::new_v4(),
            post_id: cta.post_id,
            title: cta.title,
            content: cta.content,
            button_text: cta.button_text,
            button_url: cta.button_url,
            position_in_content: cta.position_in_content,
            click_count: 0,
            created_at: now,
            updated_at: now,
        };
        tables.call_to_actions.push(record.clone());
        Ok(record)
    }

    async fn get_call_to_action(&self, id: Uuid) -> Result<Option<CallToAction>> {
        let tables = self.tables.read().expect("storage lock poisoned");
        Ok(tables.call_to_actions.iter().find(|c| c.id == id).cloned())
    }

    async fn list_call_to_actions(&self, post_id: Option<Uuid>) -> Result<Vec<CallToAction>> {
        let tables = self.tables.read().expect("storage lock poisoned");
        let mut ctas: Vec<CallToAction> = tables
            .call_to_actions
            .iter()
            .rev()
            .filter(|c| post_id.map_or(true, |v| c.post_id == Some(v)))
            .cloned()
            .collect();
        ctas.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(ctas)
    }

    async fn update_call_to_action(
        &self,
        id: Uuid,
        update: CallToActionUpdate,
    ) -> Result<Option<CallToAction>> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        let Some(cta) = tables.call_to_actions.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(post_id) = update.post_id {
            cta.post_id = Some(post_id);
        }
        if let Some(title) = update.title {
            cta.title = title;
        }
        if let Some(content) = update.content {
            cta.content = Some(content);
        }
        if let Some(button_text) = update.button_text {
            cta.button_text = button_text;
        }
        if let Some(button_url) = update.button_url {
            cta.button_url = button_url;
        }
        if let Some(position) = update.position_in_content {
            cta.position_in_content = Some(position);
        }
        cta.updated_at = Utc::now();
        Ok(Some(cta.clone()))
    }

    async fn delete_call_to_action(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        let before = tables.call_to_actions.len();
        tables.call_to_actions.retain(|c| c.id != id);
        Ok(tables.call_to_actions.len() < before)
    }

    async fn increment_cta_click(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        match tables.call_to_actions.iter_mut().find(|c| c.id == id) {
            Some(cta) => {
                cta.click_count += 1;
                cta.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn create_event(&self, event: NewAnalyticsEvent) -> Result<AnalyticsEvent> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        let record = AnalyticsEvent {
            id: Uuid::new_v4(),
            event_type: event.event_type,
            event_data: event.event_data,
            post_id: event.post_id,
            user_agent: event.user_agent,
            ip_address: event.ip_address,
            created_at: Utc::now(),
        };
        tables.events.push(record.clone());
        Ok(record)
    }

    async fn list_events(&self, limit: u32) -> Result<Vec<AnalyticsEvent>> {
        let tables = self.tables.read().expect("storage lock poisoned");
        let mut events: Vec<AnalyticsEvent> = tables.events.iter().rev().cloned().collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        events.truncate(limit as usize);
        Ok(events)
    }

    async fn get_setting(&self, key: &str) -> Result<Option<SiteSetting>> {
        let tables = self.tables.read().expect("storage lock poisoned");
        Ok(tables.settings.iter().find(|s| s.key == key).cloned())
    }

    async fn list_settings(&self) -> Result<Vec<SiteSetting>> {
        let tables = self.tables.read().expect("storage lock poisoned");
        let mut settings = tables.settings.clone();
        settings.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(settings)
    }

    async fn upsert_setting(&self, key: &str, value: &str) -> Result<SiteSetting> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        let now = Utc::now();
        if let Some(setting) = tables.settings.iter_mut().find(|s| s.key == key) {
            setting.value = value.to_owned();
            setting.updated_at = now;
            return Ok(setting.clone());
        }
        let record = SiteSetting {
            key: key.to_owned(),
            value: value.to_owned(),
            created_at: now,
            updated_at: now,
        };
        tables.settings.push(record.clone());
        Ok(record)
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().expect("storage lock poisoned");
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(Error::conflict(format!(
                "username already taken: {}",
                user.username
            )));
        }
        let record = User {
            id: Uuid::new_v4(),
            username: user.username,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.push(record.clone());
        Ok(record)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let tables = self.tables.read().expect("storage lock poisoned");
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().expect("storage lock poisoned");
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }
}
