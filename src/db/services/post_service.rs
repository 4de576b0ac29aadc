use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, LoaderTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::db::entities::{
    message, post, post_tag,
    prelude::{Message, Post, PostTag, Tag},
    tag,
};
use crate::db::services::tag_service;

/// One window over the post collection, with each post's messages and tags
/// loaded alongside it.
pub struct PostPage {
    pub posts: Vec<(post::Model, Vec<message::Model>, Vec<tag::Model>)>,
    pub total_posts: u64,
    pub total_pages: u64,
}

/// Fetches the window `[(page-1)*limit, page*limit)` over posts ordered
/// pinned-first, then newest-first. A page past the end yields an empty
/// window with the totals still filled in.
pub async fn list_posts(db: &DbConn, page: u64, limit: u64) -> Result<PostPage, DbErr> {
    let paginator = Post::find()
        .order_by_desc(post::Column::IsPinned)
        .order_by_desc(post::Column::CreatedAt)
        .paginate(db, limit);

    let totals = paginator.num_items_and_pages().await?;
    let posts = paginator.fetch_page(page.saturating_sub(1)).await?;

    let messages = posts.load_many(Message, db).await?;
    let tags = posts.load_many_to_many(Tag, PostTag, db).await?;

    let posts = posts
        .into_iter()
        .zip(messages)
        .zip(tags)
        .map(|((post, mut messages), tags)| {
            messages.sort_by_key(|m| m.id);
            (post, messages, tags)
        })
        .collect();

    Ok(PostPage {
        posts,
        total_posts: totals.number_of_items,
        total_pages: totals.number_of_pages,
    })
}

/// Inserts a post together with its tag associations in one transaction, so a
/// failed tag insert rolls the post back as well. Tags are found or created
/// by name; repeated names collapse to a single association. Returns the new
/// post and its associated tags.
pub async fn create_post(
    db: &DbConn,
    title: String,
    content: String,
    tag_names: Vec<String>,
    image_urls: Vec<String>,
    author: String,
    author_avatar: String,
) -> Result<(post::Model, Vec<tag::Model>), DbErr> {
    let txn = db.begin().await?;

    let new_post = post::ActiveModel {
        title: Set(title),
        author: Set(author),
        author_avatar: Set(author_avatar),
        created_at: Set(Utc::now()),
        content: Set(content),
        image_urls: Set(post::ImageUrls(image_urls)),
        is_pinned: Set(false),
        likes: Set(0),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    // First-seen order; a repeated name must not hit the composite pk twice.
    let mut seen = std::collections::HashSet::new();
    let tag_names: Vec<String> = tag_names.into_iter().filter(|n| seen.insert(n.clone())).collect();

    let mut tags = Vec::with_capacity(tag_names.len());
    for name in tag_names {
        let tag = tag_service::find_or_create_tag(&txn, &name).await?;
        post_tag::ActiveModel {
            post_id: Set(new_post.id),
            tag_id: Set(tag.id),
        }
        .insert(&txn)
        .await?;
        tags.push(tag);
    }

    txn.commit().await?;
    Ok((new_post, tags))
}

/// Deletes a post and everything it owns (messages and tag associations) in
/// one transaction. Deleting an already-deleted post is a no-op.
pub async fn delete_post(db: &DbConn, post_id: i32) -> Result<u64, DbErr> {
    let txn = db.begin().await?;

    Message::delete_many()
        .filter(message::Column::PostId.eq(post_id))
        .exec(&txn)
        .await?;
    PostTag::delete_many()
        .filter(post_tag::Column::PostId.eq(post_id))
        .exec(&txn)
        .await?;
    let result = Post::delete_many()
        .filter(post::Column::Id.eq(post_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    Ok(result.rows_affected)
}

/// Adjusts a post's like counter by exactly ±1 in a single atomic update.
///
/// The direction comes from the caller's `is_liked` flag: the server does not
/// verify it against prior state, so a client asserting `is_liked: true` on a
/// zero-like post drives the counter negative. Preserved as-is; see the
/// service tests.
pub async fn toggle_like(db: &DbConn, post_id: i32, is_liked: bool) -> Result<(), DbErr> {
    let delta: i32 = if is_liked { -1 } else { 1 };
    Post::update_many()
        .col_expr(post::Column::Likes, Expr::col(post::Column::Likes).add(delta))
        .filter(post::Column::Id.eq(post_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Sets a post's pinned flag to the caller-supplied value.
pub async fn set_pinned(db: &DbConn, post_id: i32, is_pinned: bool) -> Result<(), DbErr> {
    Post::update_many()
        .col_expr(post::Column::IsPinned, Expr::value(is_pinned))
        .filter(post::Column::Id.eq(post_id))
        .exec(db)
        .await?;
    Ok(())
}
