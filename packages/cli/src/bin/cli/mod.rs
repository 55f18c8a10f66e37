pub mod cards;
pub mod tokens;
pub mod users;
pub mod utils;
