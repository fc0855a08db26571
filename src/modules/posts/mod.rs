// Posts module

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{Post, PostStatus};
pub use services::PostService;
