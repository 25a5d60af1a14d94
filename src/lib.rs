// Library for tests to access modules

pub mod aggregator;
pub mod config;
pub mod error;
pub mod executor;
pub mod models;
pub mod routes;
pub mod store;
pub mod version;
