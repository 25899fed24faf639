pub mod clock;
pub mod command;
pub mod config;
pub mod console;
pub mod engine;
pub mod model;
pub mod notify;
pub mod observability;
pub mod store;
