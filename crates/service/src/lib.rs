//! HTTP front end for the Dubai weather prediction service

pub mod api;
pub mod config;
