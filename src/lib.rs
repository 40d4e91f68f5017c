pub mod chat;
pub mod collector;
pub mod config;
pub mod history;
pub mod output;
pub mod scoring;
