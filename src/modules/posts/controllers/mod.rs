pub mod post_controller;

pub use post_controller::configure;
