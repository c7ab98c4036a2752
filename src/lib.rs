pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod funnel;
pub mod state;
pub mod subscriptions;

#[cfg(test)]
mod testing;
