//! Request and Response models for the caching proxy
//!
//! This module defines the request description consumed by the proxy core,
//! the response descriptor it produces, and the DTOs of the admin endpoints.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ProxyQuery, ProxyRequest};
pub use responses::{
    CacheInfoResponse, HealthResponse, MessageResponse, ProxyReply, ProxyResponse, StatsResponse,
};
