//! Use cases - orchestrate ports and the access policy.

mod posts;

pub use posts::{OwnedPost, PostService};
