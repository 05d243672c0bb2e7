// src/menu.rs
//
// Camada interativa: lê opções do terminal e despacha para os serviços.
// Toda a lógica de negócio fica nos serviços; aqui só há prompt, seleção
// numerada e exibição. Erros dos serviços são exibidos e o laço continua.
use crate::{
    error::AppResult,
    models::{evento::Evento, evento::CATEGORIAS, usuario::Usuario, FORMATO_DATA_HORA},
    services::{evento_service, presenca_service, usuario_service},
    store::Store,
};
use chrono::{Local, NaiveDateTime};
use std::io::{self, BufRead, Write};

pub fn executar(store: &mut Store) -> AppResult<()> {
    loop {
        println!("\n===== Menu Principal =====");
        println!("1. Cadastrar Evento");
        println!("2. Exibir Eventos Futuros");
        println!("3. Exibir Eventos Passados");
        println!("4. Verificar Eventos Ocorrendo Agora");
        println!("5. Cadastrar Usuário");
        println!("6. Consultar Usuário");
        println!("7. Marcar Presença em Evento");
        println!("8. Cancelar Presença em Evento");
        println!("0. Sair");

        let opcao = match ler_linha("\nEscolha uma opção: ")?.trim().parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                println!("Opção inválida! Tente novamente.");
                continue;
            }
        };

        match opcao {
            1 => cadastrar_evento(store)?,
            2 => exibir_eventos("Eventos cadastrados que ainda não ocorreram:", {
                let agora = agora();
                evento_service::eventos_futuros(store, agora)
            }),
            3 => exibir_eventos("Eventos que já ocorreram:", {
                let agora = agora();
                evento_service::eventos_passados(store, agora)
            }),
            4 => exibir_eventos("Eventos ocorrendo agora:", {
                let agora = agora();
                evento_service::eventos_ocorrendo(store, agora)
            }),
            5 => cadastrar_usuario(store)?,
            6 => consultar_usuarios(store)?,
            7 => marcar_presenca(store)?,
            8 => cancelar_presenca(store)?,
            0 => {
                println!("Encerrando o programa...");
                return Ok(());
            }
            _ => println!("Opção inválida! Tente novamente."),
        }
    }
}

fn agora() -> NaiveDateTime {
    Local::now().naive_local()
}

fn ler_linha(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut linha = String::new();
    io::stdin().lock().read_line(&mut linha)?;
    Ok(linha.trim_end_matches(['\n', '\r']).to_string())
}

fn cadastrar_evento(store: &mut Store) -> AppResult<()> {
    println!("Cadastro de Evento");
    let nome = ler_linha("Nome do Evento: ")?;
    let endereco = ler_linha("Endereço: ")?;
    let cidade = ler_linha("Cidade: ")?;

    // Insiste até a categoria cair no conjunto fechado; o serviço valida de
    // novo, mas o re-prompt é responsabilidade daqui.
    let mut categoria = ler_linha("Categoria (festas, eventos esportivos, shows): ")?;
    while !CATEGORIAS.contains(&categoria.as_str()) {
        categoria =
            ler_linha("Categoria inválida! Escolha entre festas, eventos esportivos e shows: ")?;
    }

    let inicio = ler_linha("Horário de Início (Formato: dd/MM/yyyy HH:mm): ")?;
    let fim = ler_linha("Horário de Término (Formato: dd/MM/yyyy HH:mm): ")?;
    let descricao = ler_linha("Descrição: ")?;

    match evento_service::registrar_evento(
        store, &nome, &endereco, &cidade, &categoria, &inicio, &fim, &descricao,
    ) {
        Ok(()) => println!("Evento cadastrado com sucesso!"),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

fn exibir_eventos(titulo: &str, eventos: Vec<&Evento>) {
    println!("{}", titulo);
    for evento in eventos {
        println!("Nome: {}", evento.nome);
        println!("Endereço: {}", evento.endereco);
        println!("Cidade: {}", evento.cidade);
        println!("Categoria: {}", evento.categoria);
        println!(
            "Horário de Início: {}",
            evento.horario_inicio.format(FORMATO_DATA_HORA)
        );
        println!(
            "Horário de Término: {}",
            evento.horario_fim.format(FORMATO_DATA_HORA)
        );
        println!("Descrição: {}", evento.descricao);
        println!();
    }
}

fn cadastrar_usuario(store: &mut Store) -> AppResult<()> {
    println!("Cadastro de Usuário");
    let nome = ler_linha("Nome: ")?;
    let sobrenome = ler_linha("Sobrenome: ")?;
    let email = ler_linha("Email: ")?;
    let cidade = ler_linha("Cidade: ")?;

    usuario_service::registrar_usuario(store, &nome, &sobrenome, &email, &cidade)?;
    println!("Usuário cadastrado com sucesso!");
    Ok(())
}

fn exibir_usuario(usuario: &Usuario) {
    println!("ID: {}", usuario.id);
    println!("Nome: {}", usuario.nome_completo());
    println!("Email: {}", usuario.email);
    println!("Cidade: {}", usuario.cidade);
}

fn consultar_usuarios(store: &Store) -> AppResult<()> {
    println!("Consulta de Usuário");
    println!("Escolha uma opção:");
    println!("1. Pesquisar por ID");
    println!("2. Pesquisar por Nome");
    println!("3. Listar todos os Usuários");

    match ler_linha("Digite a opção: ")?.trim().parse::<u32>() {
        Ok(1) => {
            let id = match ler_linha("Digite o ID do usuário: ")?.trim().parse::<u32>() {
                Ok(n) => n,
                Err(_) => {
                    println!("Opção inválida.");
                    return Ok(());
                }
            };
            match usuario_service::find_usuario_por_id(store, id) {
                Some(usuario) => {
                    println!("Usuário encontrado:");
                    exibir_usuario(usuario);
                }
                None => println!("Usuário com o ID {} não encontrado.", id),
            }
        }
        Ok(2) => {
            let nome = ler_linha("Digite o nome e sobrenome do usuário: ")?;
            let encontrados = usuario_service::find_usuarios_por_nome(store, &nome);
            if encontrados.is_empty() {
                println!("Nenhum usuário encontrado com o nome '{}'.", nome);
            } else {
                println!("Usuários encontrados com o nome '{}':", nome);
                for usuario in encontrados {
                    exibir_usuario(usuario);
                    println!();
                }
            }
        }
        Ok(3) => {
            let usuarios = usuario_service::listar_usuarios(store);
            if usuarios.is_empty() {
                println!("Não há usuários cadastrados.");
            } else {
                println!("Lista de todos os usuários:");
                for usuario in usuarios {
                    exibir_usuario(usuario);
                    println!();
                }
            }
        }
        _ => println!("Opção inválida."),
    }
    Ok(())
}

/// Lê uma seleção numerada (1..=total); 0 ou entrada inválida cancelam.
fn selecionar(prompt: &str, total: usize) -> AppResult<Option<usize>> {
    let escolha = ler_linha(prompt)?.trim().parse::<usize>().unwrap_or(0);
    if escolha >= 1 && escolha <= total {
        Ok(Some(escolha - 1))
    } else {
        Ok(None)
    }
}

fn confirmar(prompt: &str) -> AppResult<bool> {
    Ok(ler_linha(prompt)?.trim().eq_ignore_ascii_case("s"))
}

fn marcar_presenca(store: &mut Store) -> AppResult<()> {
    if store.eventos.is_empty() {
        println!("Não há eventos disponíveis para marcar presença.");
        return Ok(());
    }
    let agora = agora();
    if evento_service::eventos_futuros(store, agora).is_empty() {
        println!("Não há eventos futuros disponíveis para marcar presença.");
        return Ok(());
    }

    let cidade = ler_linha("Digite a sua cidade: ")?;
    let na_cidade: Vec<Evento> = evento_service::eventos_futuros_na_cidade(store, agora, &cidade)
        .into_iter()
        .cloned()
        .collect();
    if na_cidade.is_empty() {
        println!("Não há eventos futuros disponíveis na sua cidade para marcar presença.");
        return Ok(());
    }

    println!("Escolha o evento para marcar presença:");
    for (i, evento) in na_cidade.iter().enumerate() {
        println!("{}. {}", i + 1, evento.nome);
    }
    let escolhido = match selecionar(
        "Digite o número do evento ou 0 para voltar ao menu principal: ",
        na_cidade.len(),
    )? {
        Some(i) => &na_cidade[i],
        None => return Ok(()),
    };
    let evento_idx = match evento_service::indice_do_evento(store, escolhido) {
        Some(i) => i,
        None => return Ok(()),
    };

    println!("Escolha a opção de pesquisa de usuário:");
    println!("1. Pesquisar por ID");
    println!("2. Pesquisar por Nome + Sobrenome");
    println!("3. Pesquisar todos usuários");

    let usuario_id = match ler_linha("Digite a opção: ")?.trim().parse::<u32>() {
        Ok(1) => {
            let id = match ler_linha("Digite o ID do usuário: ")?.trim().parse::<u32>() {
                Ok(n) => n,
                Err(_) => {
                    println!("Opção inválida.");
                    return Ok(());
                }
            };
            match usuario_service::find_usuario_por_id(store, id) {
                Some(usuario) => {
                    println!("Usuário encontrado:");
                    println!("Nome: {}", usuario.nome_completo());
                    if !confirmar("Confirmar presença para este usuário? (S/N): ")? {
                        println!("Presença não confirmada.");
                        return Ok(());
                    }
                    id
                }
                None => {
                    println!("Usuário com o ID {} não encontrado.", id);
                    return Ok(());
                }
            }
        }
        Ok(2) => {
            let nome = ler_linha("Digite o nome + sobrenome do usuário: ")?;
            let encontrados: Vec<Usuario> = usuario_service::find_usuarios_por_nome(store, &nome)
                .into_iter()
                .cloned()
                .collect();
            if encontrados.is_empty() {
                println!("Nenhum usuário encontrado com o nome '{}'.", nome);
                return Ok(());
            }
            println!("Usuários encontrados com o nome '{}':", nome);
            for (i, usuario) in encontrados.iter().enumerate() {
                println!("{}. {}", i + 1, usuario.nome_completo());
            }
            let usuario = match selecionar(
                "Digite o número do usuário ou 0 para cancelar: ",
                encontrados.len(),
            )? {
                Some(i) => &encontrados[i],
                None => {
                    println!("Número do usuário inválido.");
                    return Ok(());
                }
            };
            println!("Nome: {}", usuario.nome_completo());
            if !confirmar("Confirmar presença para este usuário? (S/N): ")? {
                println!("Presença não confirmada.");
                return Ok(());
            }
            usuario.id
        }
        Ok(3) => {
            println!("Lista de todos os usuários da cidade '{}':", cidade);
            let encontrados: Vec<Usuario> = usuario_service::usuarios_na_cidade(store, &cidade)
                .into_iter()
                .cloned()
                .collect();
            if encontrados.is_empty() {
                println!("Nenhum usuário encontrado na cidade '{}'.", cidade);
                return Ok(());
            }
            for (i, usuario) in encontrados.iter().enumerate() {
                println!("{}. {}", i + 1, usuario.nome_completo());
            }
            match selecionar(
                "Digite o número do usuário ou 0 para cancelar: ",
                encontrados.len(),
            )? {
                Some(i) => encontrados[i].id,
                None => {
                    println!("Número do usuário inválido.");
                    return Ok(());
                }
            }
        }
        _ => {
            println!("Opção de pesquisa inválida.");
            return Ok(());
        }
    };

    let nome_evento = store.eventos[evento_idx].nome.clone();
    match presenca_service::marcar_presenca(store, evento_idx, usuario_id) {
        Ok(()) => println!("Presença marcada com sucesso para o evento: {}", nome_evento),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

fn cancelar_presenca(store: &mut Store) -> AppResult<()> {
    if store.eventos.is_empty() {
        println!("Não há eventos disponíveis para cancelar presença.");
        return Ok(());
    }
    let agora = agora();
    let futuros: Vec<Evento> = evento_service::eventos_futuros(store, agora)
        .into_iter()
        .cloned()
        .collect();
    if futuros.is_empty() {
        println!("Não há eventos futuros disponíveis para cancelar presença.");
        return Ok(());
    }

    println!("Escolha o evento para cancelar presença:");
    for (i, evento) in futuros.iter().enumerate() {
        println!("{}. {} - {}", i + 1, evento.nome, evento.cidade);
    }
    let escolhido = match selecionar(
        "Digite o número do evento ou 0 para voltar ao menu principal: ",
        futuros.len(),
    )? {
        Some(i) => &futuros[i],
        None => {
            println!("Número do evento inválido.");
            return Ok(());
        }
    };
    let evento_idx = match evento_service::indice_do_evento(store, escolhido) {
        Some(i) => i,
        None => return Ok(()),
    };

    let usuario_id = match ler_linha("Digite o ID do usuário para cancelar presença: ")?
        .trim()
        .parse::<u32>()
    {
        Ok(n) => n,
        Err(_) => {
            println!("Opção inválida.");
            return Ok(());
        }
    };

    if !presenca_service::verificar_presenca_usuario(store, usuario_id) {
        println!("O usuário não está presente neste evento.");
        return Ok(());
    }

    // O cancelamento só vale para eventos da cidade do próprio usuário,
    // como no fluxo de marcação.
    let cidade_usuario = usuario_service::find_usuario_por_id(store, usuario_id)
        .map(|u| u.cidade.clone())
        .unwrap_or_default();
    if !escolhido.cidade.eq_ignore_ascii_case(&cidade_usuario) {
        println!("O evento selecionado não pertence à mesma cidade do usuário.");
        return Ok(());
    }

    match presenca_service::cancelar_presenca(store, evento_idx, usuario_id) {
        Ok(()) => println!(
            "Presença cancelada com sucesso para o usuário com ID: {}",
            usuario_id
        ),
        Err(e) => println!("Erro ao atualizar o arquivo de presença: {}", e),
    }
    Ok(())
}
