//! API layer - REST surface over the domain services

pub mod rest;
