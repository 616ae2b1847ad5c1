pub mod importer;
pub mod job;
pub mod page;
pub mod role;
pub mod toast;
pub mod user;

pub use importer::*;
pub use job::*;
pub use page::*;
pub use role::*;
pub use toast::*;
pub use user::*;
