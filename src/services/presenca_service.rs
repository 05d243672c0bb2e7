// src/services/presenca_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{evento::Evento, usuario::Usuario, FORMATO_DATA_HORA},
    store::Store,
};
use std::{
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, BufWriter, ErrorKind, Write},
    path::Path,
};

/// Prefixo da linha que abre cada bloco do arquivo de presença. A detecção
/// de duplicata e a remoção de blocos casam por esta linha.
const MARCADOR_ID: &str = "ID do Usuário:";

/// Marca a presença de um usuário em um evento (`evento_idx` é a posição na
/// lista do store).
///
/// A duplicata é verificada por três caminhos, consolidando as variantes do
/// sistema original: id já na lista de participantes, nome completo já na
/// lista (sem diferenciar caixa) ou bloco já gravado em `presenca.data`.
/// Como o arquivo de presença não é indexado por evento, um usuário com
/// qualquer bloco remanescente no arquivo não consegue marcar presença em
/// nenhum outro evento até que um cancelamento apague seu histórico —
/// comportamento herdado, ver DESIGN.md.
pub fn marcar_presenca(store: &mut Store, evento_idx: usize, usuario_id: u32) -> AppResult<()> {
    let usuario = store
        .usuarios
        .iter()
        .find(|u| u.id == usuario_id)
        .cloned()
        .ok_or_else(|| {
            AppError::NaoEncontrado(format!("Usuário com o ID {} não encontrado.", usuario_id))
        })?;
    let evento = store
        .eventos
        .get(evento_idx)
        .ok_or_else(|| AppError::NaoEncontrado("Evento não encontrado.".to_string()))?;

    let nome_completo = usuario.nome_completo();
    let ja_na_lista = evento.participantes.iter().any(|p| {
        p.id == usuario.id || p.nome_completo().eq_ignore_ascii_case(&nome_completo)
    });
    if ja_na_lista || verificar_presenca_usuario(store, usuario.id) {
        tracing::debug!(
            "Presença duplicada recusada: usuário {} no evento '{}'.",
            usuario.id,
            evento.nome
        );
        return Err(AppError::JaPresente);
    }

    // Captura nome e horário antes de mutar; o bloco do log usa os dois.
    let evento_registro = evento.clone();
    store.eventos[evento_idx].adicionar_participante(usuario.clone());

    // Falha de gravação é reportada e não desfaz a mutação em memória.
    if let Err(e) = store.salvar_eventos() {
        tracing::error!("Erro ao salvar eventos: {}", e);
    }
    if let Err(e) = store.salvar_usuarios() {
        tracing::error!("Erro ao salvar usuários: {}", e);
    }
    if let Err(e) = registrar_presenca(store.caminho_presenca(), &usuario, &evento_registro) {
        tracing::error!("Erro ao registrar presença: {}", e);
    }

    tracing::info!(
        "Presença marcada: usuário {} no evento '{}'.",
        usuario.id,
        evento_registro.nome
    );
    Ok(())
}

/// Anexa um bloco de cinco linhas rotuladas mais uma linha em branco ao
/// arquivo de presença. Registro denormalizado: pode divergir da lista de
/// participantes do evento, não há garantia transacional entre os dois.
pub fn registrar_presenca(
    caminho: &Path,
    usuario: &Usuario,
    evento: &Evento,
) -> std::io::Result<()> {
    let arquivo = OpenOptions::new().append(true).create(true).open(caminho)?;
    let mut escritor = BufWriter::new(arquivo);
    writeln!(escritor, "{} {}", MARCADOR_ID, usuario.id)?;
    writeln!(escritor, "Nome do Usuário: {}", usuario.nome_completo())?;
    writeln!(escritor, "Cidade do Usuário: {}", usuario.cidade)?;
    writeln!(escritor, "Evento: {}", evento.nome)?;
    writeln!(
        escritor,
        "Horário de Início do Evento: {}",
        evento.horario_inicio.format(FORMATO_DATA_HORA)
    )?;
    writeln!(escritor)?;
    escritor.flush()
}

/// Responde se o usuário tem algum bloco no arquivo de presença, de
/// qualquer evento: varredura linear procurando uma linha com o prefixo do
/// marcador cujo restante, aparado, seja exatamente o id. Arquivo ausente ou
/// falha de leitura contam como "não presente" (reportado no log).
pub fn verificar_presenca_usuario(store: &Store, usuario_id: u32) -> bool {
    let arquivo = match File::open(store.caminho_presenca()) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return false,
        Err(e) => {
            tracing::error!("Erro ao ler o arquivo de presença: {}", e);
            return false;
        }
    };
    for linha in BufReader::new(arquivo).lines() {
        let linha = match linha {
            Ok(l) => l,
            Err(e) => {
                tracing::error!("Erro ao ler o arquivo de presença: {}", e);
                return false;
            }
        };
        if let Some(resto) = linha.strip_prefix(MARCADOR_ID) {
            if resto.trim().parse::<u32>() == Ok(usuario_id) {
                return true;
            }
        }
    }
    false
}

/// Cancela a presença de um usuário em um evento: remove-o da lista de
/// participantes (se estiver nela), persiste os eventos e reescreve o
/// arquivo de presença apagando TODOS os blocos daquele id.
///
/// O arquivo de presença não guarda a que evento cada bloco pertence, então
/// cancelar a presença em um evento apaga o histórico do usuário em todos —
/// comportamento herdado do sistema original, preservado de propósito.
pub fn cancelar_presenca(store: &mut Store, evento_idx: usize, usuario_id: u32) -> AppResult<()> {
    let evento = store
        .eventos
        .get_mut(evento_idx)
        .ok_or_else(|| AppError::NaoEncontrado("Evento não encontrado.".to_string()))?;
    let removido = evento.remover_participante(usuario_id);
    let nome_evento = evento.nome.clone();

    if removido {
        if let Err(e) = store.salvar_eventos() {
            tracing::error!("Erro ao salvar eventos: {}", e);
        }
    }

    remover_presencas_usuario(store.caminho_presenca(), usuario_id)?;
    tracing::info!(
        "Presença cancelada: usuário {} (evento '{}').",
        usuario_id,
        nome_evento
    );
    Ok(())
}

/// Reescreve o arquivo de presença removendo todos os blocos de um id:
/// copia o arquivo linha a linha para `temp.data`; ao encontrar a linha
/// exatamente igual ao marcador do id, pula essa linha e as quatro
/// seguintes sem validar o conteúdo (o bloco tem forma fixa); a linha em
/// branco separadora permanece no lugar de cada bloco removido. No final o
/// temporário substitui o original por rename — em plataformas onde a
/// substituição não é atômica, uma falha no meio pode deixar o arquivo
/// pela metade (lacuna de consistência documentada em DESIGN.md).
pub fn remover_presencas_usuario(caminho: &Path, usuario_id: u32) -> AppResult<()> {
    let origem = match File::open(caminho) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    let caminho_temp = caminho.with_file_name("temp.data");
    let mut escritor = BufWriter::new(File::create(&caminho_temp)?);

    let marcador = format!("{} {}", MARCADOR_ID, usuario_id);
    let mut linhas = BufReader::new(origem).lines();
    while let Some(linha) = linhas.next() {
        let linha = linha?;
        if linha == marcador {
            for _ in 0..4 {
                if linhas.next().transpose()?.is_none() {
                    break;
                }
            }
            continue;
        }
        writeln!(escritor, "{}", linha)?;
    }
    escritor.flush()?;
    drop(escritor);

    std::fs::rename(&caminho_temp, caminho)?;
    Ok(())
}
