pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod server;

#[cfg(test)]
mod test_support;
