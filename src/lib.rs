pub mod cli;
pub mod config;
pub mod errors;
pub mod git;
pub mod history;
pub mod logging;
pub mod prompt;
pub mod rules;
pub mod runner;
pub mod utils;
