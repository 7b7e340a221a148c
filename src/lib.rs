// Declaração dos nossos módulos
pub mod common;
pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod scoping;
pub mod services;
pub mod storage;
