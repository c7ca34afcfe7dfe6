pub mod api;
pub mod core;
pub mod presentation;
pub mod store;
