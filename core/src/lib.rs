pub mod db;
pub mod error;
pub mod models;
pub mod script;
pub mod service;
