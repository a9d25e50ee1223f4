//! HTTP request handlers - thin layer that delegates to the domain services

pub mod authentication;
pub mod companies;
pub mod employees;
pub mod root;
