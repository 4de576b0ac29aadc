use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    routing::get,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::db::services::{message_service, post_service, tag_service};
use crate::web::models::{ActionResponse, ForumAction, ForumPageResponse, PostResponse};
use crate::web::{AppError, AppState};

const DEFAULT_PAGE_SIZE: u64 = 10;

/// Author identity is fixed until a real account system exists.
const CURRENT_USER: &str = "Current User";
const PLACEHOLDER_AVATAR: &str = "/placeholder.svg?height=40&width=40";

#[derive(Deserialize)]
pub struct ListParams {
    page: Option<u64>,
    limit: Option<u64>,
}

async fn list_forums_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<ForumPageResponse>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

    let page_data = post_service::list_posts(&app_state.db_pool, page, limit).await?;
    // The tag vocabulary is global, not derived from the posts in the window.
    let tags = tag_service::list_tag_names(&app_state.db_pool).await?;

    let posts = page_data
        .posts
        .into_iter()
        .map(|(post, messages, tags)| PostResponse::from_parts(post, messages, tags))
        .collect();

    Ok(Json(ForumPageResponse {
        posts,
        tags,
        total_posts: page_data.total_posts,
        current_page: page,
        total_pages: page_data.total_pages,
    }))
}

async fn forum_action_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<ForumAction>, JsonRejection>,
) -> Result<Json<ActionResponse>, AppError> {
    let Json(action) = payload.map_err(|rejection| {
        warn!("Rejected forum action payload: {rejection}");
        AppError::InvalidInput("Invalid action type".to_string())
    })?;

    let db = &app_state.db_pool;
    match action {
        ForumAction::NewPost {
            title,
            content,
            tags,
            image_urls,
        } => {
            let (post, post_tags) = post_service::create_post(
                db,
                title,
                content,
                tags,
                image_urls,
                CURRENT_USER.to_string(),
                PLACEHOLDER_AVATAR.to_string(),
            )
            .await?;
            info!(post_id = post.id, "Created forum post");
            Ok(Json(ActionResponse {
                post: Some(PostResponse::from_parts(post, Vec::new(), post_tags)),
                ..ActionResponse::ok()
            }))
        }
        ForumAction::DeletePost { post_id } => {
            let deleted = post_service::delete_post(db, post_id).await?;
            info!(post_id, deleted, "Deleted forum post");
            Ok(Json(ActionResponse::ok()))
        }
        ForumAction::NewMessage { post_id, message } => {
            message_service::create_message(db, post_id, message.author, message.content).await?;
            Ok(Json(ActionResponse::ok()))
        }
        ForumAction::DeleteMessage {
            post_id,
            message_id,
        } => {
            message_service::delete_message(db, post_id, message_id).await?;
            Ok(Json(ActionResponse::ok()))
        }
        ForumAction::ToggleLike { post_id, is_liked } => {
            post_service::toggle_like(db, post_id, is_liked).await?;
            Ok(Json(ActionResponse::ok()))
        }
        ForumAction::AddTag { tag } => {
            tag_service::find_or_create_tag(db, &tag)
                .await
                .map_err(|db_err| match db_err.sql_err() {
                    Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
                        AppError::Conflict("A tag with this name already exists.".to_string())
                    }
                    _ => AppError::DatabaseError(db_err.to_string()),
                })?;
            let tags = tag_service::list_tag_names(db).await?;
            Ok(Json(ActionResponse {
                tags: Some(tags),
                ..ActionResponse::ok()
            }))
        }
        ForumAction::TogglePin { post_id, is_pinned } => {
            post_service::set_pinned(db, post_id, is_pinned).await?;
            Ok(Json(ActionResponse::ok()))
        }
    }
}

pub fn forum_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_forums_handler).post(forum_action_handler))
}
