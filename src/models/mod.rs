// src/models/mod.rs
pub mod evento;
pub mod usuario;

/// Formato fixo de data/hora usado em todos os arquivos e na entrada do
/// usuário (24 horas, sem fuso).
pub const FORMATO_DATA_HORA: &str = "%d/%m/%Y %H:%M";
