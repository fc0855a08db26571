pub mod request_id;
pub mod session;

pub use request_id::RequestId;
pub use session::SessionContext;
