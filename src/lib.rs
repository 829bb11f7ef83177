pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod init;
pub mod models;
pub mod query;
pub mod store;
