use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Represents an article in the blog.
///
/// `slug` is globally unique across all posts; titles are not required to
/// be unique. `published_at` records the first publish transition and is
/// never cleared when a post is returned to draft.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    /// May dangle: a post is not invalidated by its category disappearing.
    pub category_id: Option<Uuid>,
    pub author_name: String,
    pub is_published: bool,
    pub is_featured: bool,
    /// Placement hint for the front page: "featured", "recent", "popular", ...
    pub position: String,
    pub published_at: Option<DateTime<Utc>>,
    /// Estimated reading time in minutes.
    pub read_time: i32,
    pub view_count: i64,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Represents a top-level category posts are filed under.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Represents an uploaded media asset. May exist independently of a post,
/// e.g. a featured image uploaded before the post is saved.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Media {
    pub id: Uuid,
    pub file_name: String,
    pub file_type: String,
    pub file_url: String,
    pub file_size: Option<i64>,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub post_id: Option<Uuid>,
    pub position_in_content: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Represents an affiliate link block placed inside a post body.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AffiliateLink {
    pub id: Uuid,
    pub post_id: Option<Uuid>,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub position_in_content: Option<i32>,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Represents a call-to-action block placed inside a post body.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CallToAction {
    pub id: Uuid,
    pub post_id: Option<Uuid>,
    pub title: String,
    pub content: Option<String>,
    pub button_text: String,
    pub button_url: String,
    pub position_in_content: Option<i32>,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Represents a captured analytics event. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalyticsEvent {
    pub id: Uuid,
    pub event_type: String,
    pub event_data: Option<serde_json::Value>,
    pub post_id: Option<Uuid>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Represents a key/value site setting with upsert semantics.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SiteSetting {
    pub key: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Represents an admin panel user account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A post joined with its category for presentation.
#[derive(Debug, Clone, Serialize)]
pub struct PostWithCategory {
    #[serde(flatten)]
    pub post: Post,
    pub category: Option<Category>,
}

// Input data for creating a post through the workflow. Only `title` and
// `content` are required; everything else is derived or defaulted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub category_id: Option<Uuid>,
    pub author_name: Option<String>,
    pub is_published: Option<bool>,
    pub is_featured: Option<bool>,
    pub position: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub read_time: Option<i32>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
}

// Fully resolved record data handed to a storage backend. The backend
// assigns id, view_count and timestamps.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub category_id: Option<Uuid>,
    pub author_name: String,
    pub is_published: bool,
    pub is_featured: bool,
    pub position: String,
    pub published_at: Option<DateTime<Utc>>,
    pub read_time: i32,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
}

// Partial update for a post. An absent field leaves the stored value
// untouched; supplying a field always sets it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub category_id: Option<Uuid>,
    pub author_name: Option<String>,
    pub is_published: Option<bool>,
    pub is_featured: Option<bool>,
    pub position: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub read_time: Option<i32>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
}

// Input data for creating a category through the workflow.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

// Resolved category data handed to a storage backend.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

// Partial update for a category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

// Input data for registering an uploaded media asset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMedia {
    pub file_name: String,
    pub file_type: String,
    pub file_url: String,
    pub file_size: Option<i64>,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub post_id: Option<Uuid>,
    pub position_in_content: Option<i32>,
}

// Partial update for a media asset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaUpdate {
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub post_id: Option<Uuid>,
    pub position_in_content: Option<i32>,
}

// Input data for creating an affiliate link block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAffiliateLink {
    pub post_id: Option<Uuid>,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub position_in_content: Option<i32>,
}

// Partial update for an affiliate link block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AffiliateLinkUpdate {
    pub post_id: Option<Uuid>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub position_in_content: Option<i32>,
}

// Input data for creating a call-to-action block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCallToAction {
    pub post_id: Option<Uuid>,
    pub title: String,
    pub content: Option<String>,
    pub button_text: String,
    pub button_url: String,
    pub position_in_content: Option<i32>,
}

// Partial update for a call-to-action block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallToActionUpdate {
    pub post_id: Option<Uuid>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
    pub position_in_content: Option<i32>,
}

// Input data for capturing an analytics event. Fire-and-forget.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAnalyticsEvent {
    pub event_type: String,
    pub event_data: Option<serde_json::Value>,
    pub post_id: Option<Uuid>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

// Input data for creating a user account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}
