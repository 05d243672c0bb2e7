// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Linha de arquivo que não corresponde ao formato esperado
    /// (número de campos errado ou data/hora inválida).
    #[error("Registro malformado: {0}")]
    RegistroMalformado(String),

    /// Entrada rejeitada pela validação (categoria fora do conjunto
    /// permitido, horário em formato inválido, seleção fora do intervalo).
    #[error("{0}")]
    Validacao(String),

    #[error("{0}")]
    NaoEncontrado(String),

    /// O usuário já consta na lista de participantes do evento ou no
    /// arquivo de presença.
    #[error("O usuário já está presente neste evento.")]
    JaPresente,

    #[error("Erro de E/S: {0}")]
    Io(#[from] std::io::Error),
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;
