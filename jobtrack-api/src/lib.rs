pub mod config;
pub mod database;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod helpers;
pub mod storage;

pub use database::Database;
