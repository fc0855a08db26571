pub mod event_controller;

pub use event_controller::configure;
