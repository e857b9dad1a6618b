pub mod cli;
pub mod config;
pub mod credential;
pub mod error;
pub mod ledger;
pub mod media;
pub mod session;
pub mod utils;
