mod common;
pub mod rules;
pub mod tasks;
pub mod users;

pub use common::*;
