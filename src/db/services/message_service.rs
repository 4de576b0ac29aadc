//! Messages under a post. Creating one requires the post to exist (404 at
//! the API layer), unlike the delete and toggle actions, which stay silent
//! no-ops on missing rows: a message insert has an owner to attach to, the
//! others merely remove or flip state that may already be gone.

use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, Set};

use crate::db::entities::{
    message,
    prelude::{Message, Post},
};

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),
    #[error("Post not found: {0}")]
    PostNotFound(i32),
}

/// Inserts a message under an existing post. The reply count is derived from
/// the live message rows, so no counter needs updating here.
pub async fn create_message(
    db: &DbConn,
    post_id: i32,
    author: String,
    content: String,
) -> Result<message::Model, MessageError> {
    if Post::find_by_id(post_id).one(db).await?.is_none() {
        return Err(MessageError::PostNotFound(post_id));
    }

    let new_message = message::ActiveModel {
        post_id: Set(post_id),
        author: Set(author),
        content: Set(content),
        ..Default::default()
    };

    Ok(new_message.insert(db).await?)
}

/// Deletes a message by id, scoped to its post. Deleting a message that is
/// already gone is a no-op.
pub async fn delete_message(db: &DbConn, post_id: i32, message_id: i32) -> Result<u64, DbErr> {
    let result = Message::delete_many()
        .filter(message::Column::Id.eq(message_id))
        .filter(message::Column::PostId.eq(post_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
