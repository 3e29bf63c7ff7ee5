pub mod admin;
pub mod layout;
pub mod login;
pub mod quiz;

// Re-export commonly used functions from layout
pub use layout::{page, render, titled};
