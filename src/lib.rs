pub mod cli;
pub mod config;
pub mod controller;
pub mod fetcher;
pub mod gui;
pub mod logging;
pub mod monitor;
pub mod record_log;
pub mod region;
pub mod status;
pub mod thread_manager;
pub mod transcript;
pub mod types;

#[cfg(test)]
mod testing;
