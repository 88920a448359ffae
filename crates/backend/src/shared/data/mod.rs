pub mod loader;
pub mod order_store;
