pub mod auth_gateway;
pub mod import_backend;
pub mod key_value_store;
