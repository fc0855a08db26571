pub mod adventure_controller;

pub use adventure_controller::configure;
