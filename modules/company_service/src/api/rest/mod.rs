//! REST API layer

pub mod caching;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod mapper;
pub mod negotiation;
pub mod openapi;
pub mod rate_limit;
pub mod routes;
pub mod shaping;
pub mod versioning;
