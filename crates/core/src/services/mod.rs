//! Business logic services.

#![allow(missing_docs)]

pub mod catalog;
pub mod comment;
pub mod following;
pub mod like;
pub mod notification;
pub mod post;
pub mod user;

pub use catalog::{AuthorWithBooks, CatalogService, CreateBookInput, UpdateBookInput};
pub use comment::{CommentService, CreateCommentInput, UpdateCommentInput};
pub use following::{FollowOutcome, FollowingService};
pub use like::{LikeOutcome, LikeService, UnlikeOutcome};
pub use notification::{NotificationService, NotificationTarget};
pub use post::{CreatePostInput, PostService, PostWithLikes, UpdatePostInput};
pub use user::{RegisterInput, UpdateProfileInput, UserService};
