//! CVE Service - read-only HTTP gateway over locally stored NVD CVE records.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
