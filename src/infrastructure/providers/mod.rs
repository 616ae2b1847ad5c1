pub mod syncar_api;

pub use syncar_api::*;
