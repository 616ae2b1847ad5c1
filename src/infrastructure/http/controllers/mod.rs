pub mod catalog;
pub mod importers;
pub mod jobs;
pub mod navigation;
pub mod pages;
pub mod roles;
pub mod session;
pub mod toasts;
pub mod users;
