//! # TaskFlow API Server Library
//!
//! This library provides the HTTP layer for TaskFlow: routing, authentication
//! middleware, request extraction and error mapping. Business rules live in
//! `taskflow-shared`.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Authenticated-user and validated-body extractors
//! - `middleware`: Security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
