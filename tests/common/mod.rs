#![allow(dead_code)]
//! Shared builders and the backend contract suite.

pub mod contract;

use blog_server::models::{NewCategory, NewMedia, NewPost};

/// A fully resolved post the way the workflow would hand it to a backend.
pub fn sample_post(title: &str, slug: &str) -> NewPost {
    NewPost {
        title: title.to_owned(),
        slug: slug.to_owned(),
        content: "Lorem ipsum dolor sit amet.".to_owned(),
        excerpt: None,
        featured_image: None,
        category_id: None,
        author_name: "Tester".to_owned(),
        is_published: false,
        is_featured: false,
        position: "recent".to_owned(),
        published_at: None,
        read_time: 1,
        meta_title: Some(title.to_owned()),
        meta_description: None,
        og_title: Some(title.to_owned()),
        og_description: None,
        og_image: None,
    }
}

pub fn sample_category(name: &str, slug: &str) -> NewCategory {
    NewCategory {
        name: name.to_owned(),
        slug: slug.to_owned(),
        description: Some("...".to_owned()),
        color: None,
    }
}

pub fn sample_media(file_name: &str, post_id: Option<uuid::Uuid>) -> NewMedia {
    NewMedia {
        file_name: file_name.to_owned(),
        file_type: "image/png".to_owned(),
        file_url: format!("/uploads/{}", file_name),
        file_size: Some(1024),
        alt_text: None,
        caption: None,
        post_id,
        position_in_content: None,
    }
}
