mod console;
mod menu;
mod rules;
mod tables;
mod tasks;
mod users;
mod utils;

pub use console::*;
pub use menu::*;
pub use rules::*;
pub use tables::*;
pub use tasks::*;
pub use users::*;
pub use utils::*;
