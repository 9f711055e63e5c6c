pub mod capture;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod interactive;
pub mod pipeline;
pub mod progress;
pub mod service;
pub mod session;
