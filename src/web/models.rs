use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::entities::{message, post, tag};

/// A post as returned by the list endpoint, with its message thread and tag
/// names joined in. `replies` is the live message count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub author_avatar: String,
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub tags: Vec<String>,
    pub replies: u64,
    pub likes: i32,
    pub messages: Vec<MessageResponse>,
    pub image_urls: Vec<String>,
    pub is_pinned: bool,
}

impl PostResponse {
    pub fn from_parts(
        post: post::Model,
        messages: Vec<message::Model>,
        tags: Vec<tag::Model>,
    ) -> Self {
        let messages: Vec<MessageResponse> =
            messages.into_iter().map(MessageResponse::from).collect();
        Self {
            id: post.id,
            title: post.title,
            author: post.author,
            author_avatar: post.author_avatar,
            created_at: post.created_at,
            content: post.content,
            tags: tags.into_iter().map(|t| t.name).collect(),
            replies: messages.len() as u64,
            likes: post.likes,
            messages,
            image_urls: post.image_urls.0,
            is_pinned: post.is_pinned,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: i32,
    pub author: String,
    pub content: String,
}

impl From<message::Model> for MessageResponse {
    fn from(m: message::Model) -> Self {
        Self {
            id: m.id,
            author: m.author,
            content: m.content,
        }
    }
}

/// Response of `GET /api/forums`: one window of posts plus the full tag
/// vocabulary and pagination metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumPageResponse {
    pub posts: Vec<PostResponse>,
    pub tags: Vec<String>,
    pub total_posts: u64,
    pub current_page: u64,
    pub total_pages: u64,
}

/// Typed action body of `POST /api/forums`, dispatched on the `type` field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ForumAction {
    #[serde(rename_all = "camelCase")]
    NewPost {
        title: String,
        content: String,
        #[serde(default)]
        tags: Vec<String>,
        #[serde(default, alias = "image_urls")]
        image_urls: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    DeletePost { post_id: i32 },
    #[serde(rename_all = "camelCase")]
    NewMessage {
        post_id: i32,
        message: NewMessageBody,
    },
    #[serde(rename_all = "camelCase")]
    DeleteMessage { post_id: i32, message_id: i32 },
    #[serde(rename_all = "camelCase")]
    ToggleLike { post_id: i32, is_liked: bool },
    AddTag { tag: String },
    #[serde(rename_all = "camelCase")]
    TogglePin { post_id: i32, is_pinned: bool },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewMessageBody {
    pub author: String,
    pub content: String,
}

/// Envelope returned by every write action. `post` is set for `newPost`,
/// `tags` for `addTag`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl ActionResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }
}
