pub mod config;
pub mod errors;
pub mod extraction;
pub mod locator;
pub mod resolution;
pub mod scan;
pub mod store;
pub mod types;
