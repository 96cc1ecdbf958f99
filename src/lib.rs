pub mod api;
pub mod config;
pub mod data_collector;
pub mod extract;
pub mod player;
pub mod ranking;
pub mod report;
pub mod schema;
pub mod stats;
