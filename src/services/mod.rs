// src/services/mod.rs
pub mod evento_service;
pub mod presenca_service;
pub mod usuario_service;
