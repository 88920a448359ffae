pub mod engine;
pub mod filter;
pub mod service;
