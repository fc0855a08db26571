// Users module

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{User, UserStatus};
pub use services::UserService;
