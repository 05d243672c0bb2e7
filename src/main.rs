// src/main.rs

// --- Declaração dos Módulos ---
mod error;
mod menu;
mod models;
mod services;
mod store;

use crate::store::Store;
use std::env;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuração do Logging (Tracing) ---
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            env::var("RUST_LOG")
                .unwrap_or_else(|_| "sistema_eventos=info".into())
                .into()
        }))
        .with(fmt::layer())
        .init();

    tracing::info!("Iniciando o sistema de eventos...");

    // A carga nunca falha: arquivos ausentes viram arquivos vazios e linhas
    // corrompidas interrompem só o restante do arquivo em questão.
    let mut store = Store::abrir();
    tracing::info!(
        "{} eventos e {} usuários carregados.",
        store.eventos.len(),
        store.usuarios.len()
    );

    menu::executar(&mut store)?;
    Ok(())
}
