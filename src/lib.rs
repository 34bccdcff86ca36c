pub mod command;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod naming;
pub mod prompt;
pub mod render;
pub mod rules;
pub mod writer;
