//! Domain entities - the core business objects.

mod pagination;
mod post;
mod principal;
mod user;

pub use pagination::{POSTS_PER_PAGE, Page, PageRequest};
pub use post::{NewPost, Post, PostChanges};
pub use principal::Principal;
pub use user::User;
