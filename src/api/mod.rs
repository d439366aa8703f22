//! API Module
//!
//! HTTP handlers and routing around the caching proxy core.
//!
//! # Endpoints
//! - `POST /proxy` - Proxy a described request through the cache
//! - `ANY /http/*target` - Proxy directly to `https://{target}`
//! - `GET /cache/info/:key` - Describe a stored entry
//! - `DELETE /cache/:key` - Delete one entry
//! - `DELETE /cache/clear` - Clear the memory backend
//! - `GET /stats` - Request counters and hit rate
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
