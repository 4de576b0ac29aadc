use std::collections::HashSet;

use crate::web::models::{ForumAction, ForumPageResponse, MessageResponse, NewMessageBody};

use super::{ClientError, ForumApi};

/// A post transformed for display: timestamps collapsed to a calendar date,
/// tags flattened to names.
#[derive(Clone, Debug, PartialEq)]
pub struct PostView {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub author_avatar: String,
    pub date: String,
    pub content: String,
    pub tags: Vec<String>,
    pub replies: u64,
    pub likes: i32,
    pub messages: Vec<MessageResponse>,
    pub image_urls: Vec<String>,
    pub is_pinned: bool,
}

impl From<crate::web::models::PostResponse> for PostView {
    fn from(post: crate::web::models::PostResponse) -> Self {
        Self {
            id: post.id,
            title: post.title,
            author: post.author,
            author_avatar: post.author_avatar,
            date: post.created_at.format("%Y-%m-%d").to_string(),
            content: post.content,
            tags: post.tags,
            replies: post.replies,
            likes: post.likes,
            messages: post.messages,
            image_urls: post.image_urls,
            is_pinned: post.is_pinned,
        }
    }
}

/// Holds one loaded page of the forum and orchestrates mutations against the
/// API.
///
/// The like toggle is optimistic: local state flips immediately and is
/// reverted if the request fails. Every other mutation submits first and then
/// re-fetches the current page wholesale. Fetches carry a sequence number so
/// a response from a superseded fetch is discarded instead of clobbering a
/// newer one.
pub struct ForumController<A: ForumApi> {
    api: A,
    pub posts: Vec<PostView>,
    pub all_tags: Vec<String>,
    pub current_page: u64,
    pub total_pages: u64,
    page_size: u64,
    pub selected_tags: HashSet<String>,
    pub search_query: String,
    pub liked_posts: HashSet<i32>,
    pub expanded_post_id: Option<i32>,
    pub is_admin: bool,
    current_user: String,
    like_in_flight: Option<i32>,
    fetch_seq: u64,
}

impl<A: ForumApi> ForumController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            posts: Vec::new(),
            all_tags: Vec::new(),
            current_page: 1,
            total_pages: 1,
            page_size: 10,
            selected_tags: HashSet::new(),
            search_query: String::new(),
            liked_posts: HashSet::new(),
            expanded_post_id: None,
            is_admin: false,
            current_user: "Current User".to_string(),
            like_in_flight: None,
            fetch_seq: 0,
        }
    }

    /// Re-fetches the current page and replaces the local collection.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let seq = self.begin_fetch();
        let page = self.api.fetch_page(self.current_page, self.page_size).await?;
        self.apply_page(seq, page);
        Ok(())
    }

    pub async fn set_page(&mut self, page: u64) -> Result<(), ClientError> {
        self.current_page = page.max(1);
        self.refresh().await
    }

    pub async fn next_page(&mut self) -> Result<(), ClientError> {
        self.set_page((self.current_page + 1).min(self.total_pages.max(1)))
            .await
    }

    pub async fn previous_page(&mut self) -> Result<(), ClientError> {
        self.set_page(self.current_page.saturating_sub(1)).await
    }

    fn begin_fetch(&mut self) -> u64 {
        self.fetch_seq += 1;
        self.fetch_seq
    }

    /// Applies a fetched page if it is still the most recent fetch. A stale
    /// response (superseded by a later `begin_fetch`) is dropped.
    fn apply_page(&mut self, seq: u64, page: ForumPageResponse) -> bool {
        if seq != self.fetch_seq {
            return false;
        }
        self.posts = page.posts.into_iter().map(PostView::from).collect();
        self.all_tags = page.tags;
        self.total_pages = page.total_pages;
        self.like_in_flight = None;
        true
    }

    /// Posts of the loaded page that pass the tag filter and search text,
    /// pinned posts first. The sort is stable, so unpinned posts keep the
    /// order the server returned.
    pub fn visible_posts(&self) -> Vec<&PostView> {
        let query = self.search_query.to_lowercase();
        let mut visible: Vec<&PostView> = self
            .posts
            .iter()
            .filter(|post| {
                (self.selected_tags.is_empty()
                    || post.tags.iter().any(|t| self.selected_tags.contains(t)))
                    && (post.title.to_lowercase().contains(&query)
                        || post.content.to_lowercase().contains(&query))
            })
            .collect();
        visible.sort_by(|a, b| b.is_pinned.cmp(&a.is_pinned));
        visible
    }

    pub fn toggle_tag_filter(&mut self, tag: &str) {
        if !self.selected_tags.remove(tag) {
            self.selected_tags.insert(tag.to_string());
        }
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn toggle_messages(&mut self, post_id: i32) {
        self.expanded_post_id = if self.expanded_post_id == Some(post_id) {
            None
        } else {
            Some(post_id)
        };
    }

    pub fn expanded_post(&self) -> Option<&PostView> {
        let id = self.expanded_post_id?;
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn is_liked(&self, post_id: i32) -> bool {
        self.liked_posts.contains(&post_id)
    }

    pub fn is_like_in_flight(&self, post_id: i32) -> bool {
        self.like_in_flight == Some(post_id)
    }

    pub fn can_manage_post(&self, author: &str) -> bool {
        self.is_admin || author == self.current_user
    }

    pub fn can_manage_message(&self, author: &str) -> bool {
        self.is_admin || author == self.current_user
    }

    /// Optimistically flips the liked state and like count, then submits the
    /// toggle. On failure both are reverted. Ignored while a toggle for the
    /// same post is still in flight.
    pub async fn toggle_like(&mut self, post_id: i32) -> Result<(), ClientError> {
        if self.like_in_flight == Some(post_id) {
            return Ok(());
        }
        let was_liked = self.liked_posts.contains(&post_id);
        self.apply_like_delta(post_id, was_liked);
        self.like_in_flight = Some(post_id);

        let result = self
            .api
            .submit(&ForumAction::ToggleLike {
                post_id,
                is_liked: was_liked,
            })
            .await;

        self.like_in_flight = None;
        if let Err(err) = result {
            self.apply_like_delta(post_id, !was_liked);
            return Err(err);
        }
        Ok(())
    }

    fn apply_like_delta(&mut self, post_id: i32, was_liked: bool) {
        if was_liked {
            self.liked_posts.remove(&post_id);
        } else {
            self.liked_posts.insert(post_id);
        }
        if let Some(post) = self.posts.iter_mut().find(|p| p.id == post_id) {
            post.likes += if was_liked { -1 } else { 1 };
        }
    }

    pub async fn create_post(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
        image_urls: Vec<String>,
    ) -> Result<(), ClientError> {
        self.api
            .submit(&ForumAction::NewPost {
                title: title.into(),
                content: content.into(),
                tags,
                image_urls,
            })
            .await?;
        self.refresh().await
    }

    pub async fn delete_post(&mut self, post_id: i32) -> Result<(), ClientError> {
        let allowed = self
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .is_some_and(|p| self.is_admin || p.author == self.current_user);
        if !allowed {
            return Ok(());
        }
        self.api
            .submit(&ForumAction::DeletePost { post_id })
            .await?;
        self.refresh().await
    }

    pub async fn add_message(
        &mut self,
        post_id: i32,
        content: impl Into<String>,
    ) -> Result<(), ClientError> {
        self.api
            .submit(&ForumAction::NewMessage {
                post_id,
                message: NewMessageBody {
                    author: self.current_user.clone(),
                    content: content.into(),
                },
            })
            .await?;
        self.refresh().await
    }

    pub async fn delete_message(
        &mut self,
        post_id: i32,
        message_id: i32,
    ) -> Result<(), ClientError> {
        self.api
            .submit(&ForumAction::DeleteMessage {
                post_id,
                message_id,
            })
            .await?;
        self.refresh().await
    }

    /// Admin-only affordance, like the pin toggle below.
    pub async fn add_tag(&mut self, tag: impl Into<String>) -> Result<(), ClientError> {
        if !self.is_admin {
            return Ok(());
        }
        self.api
            .submit(&ForumAction::AddTag { tag: tag.into() })
            .await?;
        self.refresh().await
    }

    pub async fn toggle_pin(&mut self, post_id: i32) -> Result<(), ClientError> {
        if !self.is_admin {
            return Ok(());
        }
        let Some(post) = self.posts.iter().find(|p| p.id == post_id) else {
            return Ok(());
        };
        self.api
            .submit(&ForumAction::TogglePin {
                post_id,
                is_pinned: !post.is_pinned,
            })
            .await?;
        self.refresh().await
    }
}
