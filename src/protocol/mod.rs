//! Corpus Gateway Protocol
//!
//! HTTP access to the gateway.
//!
//! # Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |  HTTP Endpoints:                                            |
//! |    - GET  /health, /stats                                   |
//! |    - POST /query          search, interactive or record     |
//! |    - POST /table/:kind    sections or tuples                |
//! |    - POST /passage        passage browsing                  |
//! |    - POST /export         export document                   |
//! |    - POST /download       .tar.gz archive of CSV tables     |
//! +-------------------------------------------------------------+
//! |  Wire Format: JSON                                          |
//! +-------------------------------------------------------------+
//! ```
//!
//! # Module Structure
//!
//! - `handler` - Process-wide state shared by all routes
//! - `rest` - REST API handlers and routing

pub mod handler;
pub mod rest;

pub use handler::Handler;
