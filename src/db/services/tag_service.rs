use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbConn, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::db::entities::{prelude::Tag, tag};

/// Returns the full tag vocabulary in insertion order.
pub async fn list_tag_names(db: &DbConn) -> Result<Vec<String>, DbErr> {
    let tags = Tag::find().order_by_asc(tag::Column::Id).all(db).await?;
    Ok(tags.into_iter().map(|t| t.name).collect())
}

/// Looks a tag up by name, inserting it if absent. Generic over the
/// connection so it also runs inside a transaction.
pub async fn find_or_create_tag<C: ConnectionTrait>(db: &C, name: &str) -> Result<tag::Model, DbErr> {
    if let Some(existing) = Tag::find()
        .filter(tag::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    tag::ActiveModel {
        name: Set(name.to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await
}
