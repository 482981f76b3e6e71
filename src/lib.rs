// Library exports for Taleweaver
// This allows integration tests and external code to use Taleweaver modules

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod game;
pub mod routes;
pub mod state;
pub mod validate;
