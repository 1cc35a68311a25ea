//! Network operations
//!
//! HTTP client shared by the providers.

pub mod client;

pub use client::HttpClient;
