pub mod job_tracker;
pub mod notification_service;
pub mod permission_service;
pub mod session_service;

pub use job_tracker::*;
pub use notification_service::*;
pub use permission_service::*;
pub use session_service::*;
