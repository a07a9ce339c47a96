//! Postgres-backed storage.
//!
//! Schema lives in `migrations/`. Ids and timestamps are server-generated
//! (`gen_random_uuid()`, `now()`); updates refresh `updated_at` explicitly.
//! Slug uniqueness is enforced by unique indexes; constraint violations are
//! translated into the same `Conflict` the in-memory backend raises, so the
//! index stays the source of truth under concurrent writers.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::{PostFilter, Storage};
use crate::error::{Error, Result};
use crate::models::*;

pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects, sizes the pool and applies pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| Error::Database(e.into()))?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn create_post(&self, post: NewPost) -> Result<Post> {
        let created = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (
                title, slug, content, excerpt, featured_image, category_id,
                author_name, is_published, is_featured, position, published_at,
                read_time, meta_title, meta_description, og_title,
                og_description, og_image
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.content)
        .bind(&post.excerpt)
        .bind(&post.featured_image)
        .bind(post.category_id)
        .bind(&post.author_name)
        .bind(post.is_published)
        .bind(post.is_featured)
        .bind(&post.position)
        .bind(post.published_at)
        .bind(post.read_time)
        .bind(&post.meta_title)
        .bind(&post.meta_description)
        .bind(&post.og_title)
        .bind(&post.og_description)
        .bind(&post.og_image)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Error::translate_unique(e, Error::slug_taken(&post.slug)))?;
        Ok(created)
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn list_posts(&self, filter: &PostFilter) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT * FROM posts
            WHERE ($1::boolean IS NULL OR is_published = $1)
              AND ($2::uuid IS NULL OR category_id = $2)
              AND ($3::boolean IS NULL OR is_featured = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(filter.published)
        .bind(filter.category_id)
        .bind(filter.featured)
        .bind(filter.pagination.limit() as i64)
        .bind(filter.pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    async fn update_post(&self, id: Uuid, update: PostUpdate) -> Result<Option<Post>> {
        let slug_for_conflict = update.slug.clone().unwrap_or_default();
        let updated = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                content = COALESCE($4, content),
                excerpt = COALESCE($5, excerpt),
                featured_image = COALESCE($6, featured_image),
                category_id = COALESCE($7, category_id),
                author_name = COALESCE($8, author_name),
                is_published = COALESCE($9, is_published),
                is_featured = COALESCE($10, is_featured),
                position = COALESCE($11, position),
                published_at = COALESCE($12, published_at),
                read_time = COALESCE($13, read_time),
                meta_title = COALESCE($14, meta_title),
                meta_description = COALESCE($15, meta_description),
                og_title = COALESCE($16, og_title),
                og_description = COALESCE($17, og_description),
                og_image = COALESCE($18, og_image),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.slug)
        .bind(&update.content)
        .bind(&update.excerpt)
        .bind(&update.featured_image)
        .bind(update.category_id)
        .bind(&update.author_name)
        .bind(update.is_published)
        .bind(update.is_featured)
        .bind(&update.position)
        .bind(update.published_at)
        .bind(update.read_time)
        .bind(&update.meta_title)
        .bind(&update.meta_description)
        .bind(&update.og_title)
        .bind(&update.og_description)
        .bind(&update.og_image)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::translate_unique(e, Error::slug_taken(&slug_for_conflict)))?;
        Ok(updated)
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_post_views(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE posts SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_posts_in_category(&self, category_id: Uuid) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE category_id = $1")
                .bind(category_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category> {
        let created = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, slug, description, color)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(&category.color)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Error::translate_unique(e, Error::slug_taken(&category.slug)))?;
        Ok(created)
    }

    async fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    async fn get_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    async fn update_category(&self, id: Uuid, update: CategoryUpdate) -> Result<Option<Category>> {
        let slug_for_conflict = update.slug.clone().unwrap_or_default();
        let updated = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                color = COALESCE($5, color),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.slug)
        .bind(&update.description)
        .bind(&update.color)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::translate_unique(e, Error::slug_taken(&slug_for_conflict)))?;
        Ok(updated)
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_media(&self, media: NewMedia) -> Result<Media> {
        let created = sqlx::query_as::<_, Media>(
            r#"
            INSERT INTO media (
                file_name, file_type, file_url, file_size, alt_text, caption,
                post_id, position_in_content
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&media.file_name)
        .bind(&media.file_type)
        .bind(&media.file_url)
        .bind(media.file_size)
        .bind(&media.alt_text)
        .bind(&media.caption)
        .bind(media.post_id)
        .bind(media.position_in_content)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn get_media(&self, id: Uuid) -> Result<Option<Media>> {
        let media = sqlx::query_as::<_, Media>("SELECT * FROM media WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(media)
    }

    async fn list_media(&self, post_id: Option<Uuid>) -> Result<Vec<Media>> {
        let media = sqlx::query_as::<_, Media>(
            r#"
            SELECT * FROM media
            WHERE ($1::uuid IS NULL OR post_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(media)
    }

    async fn update_media(&self, id: Uuid, update: MediaUpdate) -> Result<Option<Media>> {
        let updated = sqlx::query_as::<_, Media>(
            r#"
            UPDATE media SET
                alt_text = COALESCE($2, alt_text),
                caption = COALESCE($3, caption),
                post_id = COALESCE($4, post_id),
                position_in_content = COALESCE($5, position_in_content)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.alt_text)
        .bind(&update.caption)
        .bind(update.post_id)
        .bind(update.position_in_content)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete_media(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_affiliate_link(&self, link: NewAffiliateLink) -> Result<AffiliateLink> {
        let created = sqlx::query_as::<_, AffiliateLink>(
            r#"
            INSERT INTO affiliate_links (post_id, title, url, description, position_in_content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(link.post_id)
        .bind(&link.title)
        .bind(&link.url)
        .bind(&link.description)
        .bind(link.position_in_content)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn get_affiliate_link(&self, id: Uuid) -> Result<Option<AffiliateLink>> {
        let link =
            sqlx::query_as::<_, AffiliateLink>("SELECT * FROM affiliate_links WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(link)
    }

    async fn list_affiliate_links(&self, post_id: Option<Uuid>) -> Result<Vec<AffiliateLink>> {
        let links = sqlx::query_as::<_, AffiliateLink>(
            r#"
            SELECT * FROM affiliate_links
            WHERE ($1::uuid IS NULL OR post_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(links)
    }

    async fn update_affiliate_link(
        &self,
        id: Uuid,
        update: AffiliateLinkUpdate,
    ) -> Result<Option<AffiliateLink>> {
        let updated = sqlx::query_as::<_, AffiliateLink>(
            r#"
            UPDATE affiliate_links SET
                post_id = COALESCE($2, post_id),
                title = COALESCE($3, title),
                url = COALESCE($4, url),
                description = COALESCE($5, description),
                position_in_content = COALESCE($6, position_in_content),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.post_id)
        .bind(&update.title)
        .bind(&update.url)
        .bind(&update.description)
        .bind(update.position_in_content)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete_affiliate_link(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM affiliate_links WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_affiliate_click(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE affiliate_links SET click_count = click_count + 1, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_call_to_action(&self, cta: NewCallToAction) -> Result<CallToAction> {
        let created = sqlx::query_as::<_, CallToAction>(
            r#"
            INSERT INTO call_to_actions (
                post_id, title, content, button_text, button_url, position_in_content
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(cta.post_id)
        .bind(&cta.title)
        .bind(&cta.content)
        .bind(&cta.button_text)
        .bind(&cta.button_url)
        .bind(cta.position_in_content)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn get_call_to_action(&self, id: Uuid) -> Result<Option<CallToAction>> {
        let cta =
            sqlx::query_as::<_, CallToAction>("SELECT * FROM call_to_actions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(cta)
    }

    async fn list_call_to_actions(&self, post_id: Option<Uuid>) -> Result<Vec<CallToAction>> {
        let ctas = sqlx::query_as::<_, CallToAction>(
            r#"
            SELECT * FROM call_to_actions
            WHERE ($1::uuid IS NULL OR post_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ctas)
    }

    async fn update_call_to_action(
        &self,
        id: Uuid,
        update: CallToActionUpdate,
    ) -> Result<Option<CallToAction>> {
        let updated = sqlx::query_as::<_, CallToAction>(
            r#"
            UPDATE call_to_actions SET
                post_id = COALESCE($2, post_id),
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                button_text = COALESCE($5, button_text),
                button_url = COALESCE($6, button_url),
                position_in_content = COALESCE($7, position_in_content),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.post_id)
        .bind(&update.title)
        .bind(&update.content)
        .bind(&update.button_text)
        .bind(&update.button_url)
        .bind(update.position_in_content)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete_call_to_action(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM call_to_actions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn increment_cta_click(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE call_to_actions SET click_count = click_count + 1, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_event(&self, event: NewAnalyticsEvent) -> Result<AnalyticsEvent> {
        let created = sqlx::query_as::<_, AnalyticsEvent>(
            r#"
            INSERT INTO analytics_events (event_type, event_data, post_id, user_agent, ip_address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&event.event_type)
        .bind(&event.event_data)
        .bind(event.post_id)
        .bind(&event.user_agent)
        .bind(&event.ip_address)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_events(&self, limit: u32) -> Result<Vec<AnalyticsEvent>> {
        let events = sqlx::query_as::<_, AnalyticsEvent>(
            "SELECT * FROM analytics_events ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    async fn get_setting(&self, key: &str) -> Result<Option<SiteSetting>> {
        let setting = sqlx::query_as::<_, SiteSetting>("SELECT * FROM site_settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(setting)
    }

    async fn list_settings(&self) -> Result<Vec<SiteSetting>> {
        let settings =
            sqlx::query_as::<_, SiteSetting>("SELECT * FROM site_settings ORDER BY key ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(settings)
    }

    async fn upsert_setting(&self, key: &str, value: &str) -> Result<SiteSetting> {
        let setting = sqlx::query_as::<_, SiteSetting>(
            r#"
            INSERT INTO site_settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key)
            DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            RETURNING *
            "#,
        )
        .bind(key)
        .bind(value)
        .fetch_one(&self.pool)
        .await?;
        Ok(setting)
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            Error::translate_unique(
                e,
                Error::conflict(format!("username already taken: {}", user.username)),
            )
        })?;
        Ok(created)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}
