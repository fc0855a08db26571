// Adventures module

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{Adventure, AdventureStatus};
pub use services::AdventureService;
