pub mod avatar;
pub mod database;
