// src/lib.rs

pub mod api;
pub mod app;
pub mod attempt;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;
