pub mod config;
pub mod filter;
pub mod schema;
pub mod units;

#[cfg(target_arch = "wasm32")]
pub mod wasm;
