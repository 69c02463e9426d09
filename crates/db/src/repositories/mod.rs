//! Database repositories.

#![allow(missing_docs)]

pub mod author;
pub mod book;
pub mod comment;
pub mod following;
pub mod like;
pub mod notification;
pub mod post;
pub mod user;

pub use author::AuthorRepository;
pub use book::BookRepository;
pub use comment::CommentRepository;
pub use following::FollowingRepository;
pub use like::LikeRepository;
pub use notification::NotificationRepository;
pub use post::PostRepository;
pub use user::UserRepository;
