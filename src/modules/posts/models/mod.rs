pub mod post;

pub use post::{CreatePostRequest, Post, PostPatch, PostStatus, UpdatePostRequest, POST_POLICY};
