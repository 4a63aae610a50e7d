pub mod app;
pub mod charts;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod http;
pub mod osm;
pub mod reports;
pub mod runner;
pub mod store;
