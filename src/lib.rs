// src/lib.rs

//! Shelfmate client core library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod session;
pub mod utils;
