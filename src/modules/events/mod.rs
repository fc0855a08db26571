// Events module

pub mod controllers;
pub mod models;
pub mod services;

pub use models::{Event, EventStatus};
pub use services::EventService;
