pub mod adventures;
pub mod events;
pub mod posts;
pub mod users;
