pub mod http;
pub mod observability;
pub mod providers;
pub mod storage;
pub mod workers;
