//! SeaORM entities mapping the forum tables.
//!
//! Each entity lives in its own module; `post_tag` is the many-to-many
//! association between posts and tags.

pub mod message;
pub mod post;
pub mod post_tag;
pub mod tag;

// Prelude module for easy importing of all entities and their related types
pub mod prelude {
    pub use super::post::ActiveModel as PostActiveModel;
    pub use super::post::Column as PostColumn;
    pub use super::post::Entity as Post;
    pub use super::post::Model as PostModel;

    pub use super::message::ActiveModel as MessageActiveModel;
    pub use super::message::Column as MessageColumn;
    pub use super::message::Entity as Message;
    pub use super::message::Model as MessageModel;

    pub use super::tag::ActiveModel as TagActiveModel;
    pub use super::tag::Column as TagColumn;
    pub use super::tag::Entity as Tag;
    pub use super::tag::Model as TagModel;

    pub use super::post_tag::ActiveModel as PostTagActiveModel;
    pub use super::post_tag::Column as PostTagColumn;
    pub use super::post_tag::Entity as PostTag;
    pub use super::post_tag::Model as PostTagModel;
}
