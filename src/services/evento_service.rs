// src/services/evento_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        evento::{Evento, CATEGORIAS},
        FORMATO_DATA_HORA,
    },
    store::Store,
};
use chrono::NaiveDateTime;

/// Cadastra um evento. A categoria precisa estar no conjunto fechado
/// (`CATEGORIAS`) e os dois horários no formato `dd/MM/yyyy HH:mm`; o menu
/// é quem insiste com o usuário até a entrada ser válida, aqui só se
/// rejeita. Início antes do fim NÃO é validado (ver DESIGN.md).
#[allow(clippy::too_many_arguments)]
pub fn registrar_evento(
    store: &mut Store,
    nome: &str,
    endereco: &str,
    cidade: &str,
    categoria: &str,
    horario_inicio: &str,
    horario_fim: &str,
    descricao: &str,
) -> AppResult<()> {
    if !CATEGORIAS.contains(&categoria) {
        return Err(AppError::Validacao(format!(
            "Categoria inválida! Escolha entre {}.",
            CATEGORIAS.join(", ")
        )));
    }
    let horario_inicio = parse_horario_entrada(horario_inicio)?;
    let horario_fim = parse_horario_entrada(horario_fim)?;

    store.eventos.push(Evento::novo(
        nome,
        endereco,
        cidade,
        categoria,
        horario_inicio,
        horario_fim,
        descricao,
    ));
    if let Err(e) = store.salvar_eventos() {
        tracing::error!("Erro ao salvar eventos: {}", e);
    }
    tracing::info!("Evento '{}' cadastrado.", nome);
    Ok(())
}

fn parse_horario_entrada(texto: &str) -> AppResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(texto.trim(), FORMATO_DATA_HORA).map_err(|_| {
        AppError::Validacao(format!(
            "Horário inválido {:?} (formato esperado: dd/MM/yyyy HH:mm).",
            texto
        ))
    })
}

/// Eventos que ainda não começaram (`inicio > agora`), do mais próximo para
/// o mais distante.
pub fn eventos_futuros(store: &Store, agora: NaiveDateTime) -> Vec<&Evento> {
    let mut futuros: Vec<&Evento> = store
        .eventos
        .iter()
        .filter(|e| e.horario_inicio > agora)
        .collect();
    futuros.sort_by_key(|e| e.horario_inicio);
    futuros
}

/// Eventos já encerrados (`fim < agora`), do mais recente para o mais
/// antigo.
pub fn eventos_passados(store: &Store, agora: NaiveDateTime) -> Vec<&Evento> {
    let mut passados: Vec<&Evento> = store
        .eventos
        .iter()
        .filter(|e| e.horario_fim < agora)
        .collect();
    passados.sort_by_key(|e| std::cmp::Reverse(e.horario_fim));
    passados
}

/// Eventos em andamento (`inicio < agora < fim`), ordenados pelo início.
/// O estado de um evento (futuro, ocorrendo, passado) é sempre derivado da
/// comparação com o relógio no momento da consulta; nada é armazenado.
pub fn eventos_ocorrendo(store: &Store, agora: NaiveDateTime) -> Vec<&Evento> {
    let mut ocorrendo: Vec<&Evento> = store
        .eventos
        .iter()
        .filter(|e| e.horario_inicio < agora && e.horario_fim > agora)
        .collect();
    ocorrendo.sort_by_key(|e| e.horario_inicio);
    ocorrendo
}

/// Eventos futuros de uma cidade (comparação sem diferenciar caixa). É o
/// filtro usado pelos fluxos de marcar/cancelar presença, que só operam
/// sobre eventos que ainda vão acontecer.
pub fn eventos_futuros_na_cidade<'a>(
    store: &'a Store,
    agora: NaiveDateTime,
    cidade: &str,
) -> Vec<&'a Evento> {
    eventos_futuros(store, agora)
        .into_iter()
        .filter(|e| e.cidade.eq_ignore_ascii_case(cidade))
        .collect()
}

/// Posição de um evento na lista do store, comparando por identidade de
/// valor. Os serviços de presença mutam eventos por índice para não segurar
/// empréstimos da lista.
pub fn indice_do_evento(store: &Store, evento: &Evento) -> Option<usize> {
    store.eventos.iter().position(|e| e == evento)
}
