pub mod adventure_service;

pub use adventure_service::AdventureService;
