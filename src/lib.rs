// src/lib.rs

// Declaração dos módulos
pub mod common;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod timeline;
