pub mod audit;
pub mod cli;
pub mod commands;
pub mod context;
pub mod errors;
pub mod localized;
pub mod repository;
pub mod speaker;
