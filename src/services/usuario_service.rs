// src/services/usuario_service.rs
use crate::{error::AppResult, models::usuario::Usuario, store::Store};

/// Cadastra um novo usuário: recebe o próximo id do store, anexa à lista e
/// persiste. Falha de gravação é reportada e não aborta (a lista em memória
/// fica à frente do arquivo até a próxima gravação bem-sucedida).
pub fn registrar_usuario(
    store: &mut Store,
    nome: &str,
    sobrenome: &str,
    email: &str,
    cidade: &str,
) -> AppResult<Usuario> {
    let id = store.alocar_id_usuario();
    let usuario = Usuario::novo(id, nome, sobrenome, email, cidade);
    store.usuarios.push(usuario.clone());

    if let Err(e) = store.salvar_usuarios() {
        tracing::error!("Erro ao salvar usuários: {}", e);
    }
    tracing::info!("Usuário '{}' cadastrado com id {}.", usuario.nome_completo(), id);
    Ok(usuario)
}

/// Busca um usuário pelo seu id.
pub fn find_usuario_por_id(store: &Store, id: u32) -> Option<&Usuario> {
    tracing::debug!("Buscando usuário por id: {}", id);
    store.usuarios.iter().find(|u| u.id == id)
}

/// Busca usuários por nome completo ("nome sobrenome"), ignorando
/// maiúsculas/minúsculas. Pode haver homônimos, por isso a lista.
pub fn find_usuarios_por_nome<'a>(store: &'a Store, nome_completo: &str) -> Vec<&'a Usuario> {
    tracing::debug!("Buscando usuários por nome: {}", nome_completo);
    store
        .usuarios
        .iter()
        .filter(|u| u.nome_completo().eq_ignore_ascii_case(nome_completo))
        .collect()
}

/// Lista os usuários de uma cidade (comparação sem diferenciar caixa).
pub fn usuarios_na_cidade<'a>(store: &'a Store, cidade: &str) -> Vec<&'a Usuario> {
    store
        .usuarios
        .iter()
        .filter(|u| u.cidade.eq_ignore_ascii_case(cidade))
        .collect()
}

/// Todos os usuários, na ordem de cadastro.
pub fn listar_usuarios(store: &Store) -> &[Usuario] {
    &store.usuarios
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_de_teste() -> (Store, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Store::com_caminhos(dir.path());
        (store, dir)
    }

    #[test]
    fn registrar_atribui_ids_sequenciais_e_persiste() {
        let (mut store, dir) = store_de_teste();

        let ana = registrar_usuario(&mut store, "Ana", "Silva", "a@x.com", "Cidade Y").unwrap();
        let bia = registrar_usuario(&mut store, "Bia", "Souza", "b@x.com", "Cidade Z").unwrap();
        assert_eq!(ana.id, 1);
        assert_eq!(bia.id, 2);

        let conteudo = std::fs::read_to_string(dir.path().join("users.data")).unwrap();
        assert_eq!(conteudo, "Ana;Silva;a@x.com;Cidade Y\nBia;Souza;b@x.com;Cidade Z\n");
    }

    #[test]
    fn busca_por_id_e_por_nome() {
        let (mut store, _dir) = store_de_teste();
        registrar_usuario(&mut store, "Ana", "Silva", "a@x.com", "Cidade Y").unwrap();
        registrar_usuario(&mut store, "ana", "silva", "a2@x.com", "Cidade Z").unwrap();

        assert_eq!(find_usuario_por_id(&store, 1).unwrap().email, "a@x.com");
        assert!(find_usuario_por_id(&store, 99).is_none());

        // A busca por nome ignora caixa e devolve os homônimos.
        let encontrados = find_usuarios_por_nome(&store, "ANA SILVA");
        assert_eq!(encontrados.len(), 2);

        assert!(find_usuarios_por_nome(&store, "Ana").is_empty());
    }

    #[test]
    fn filtro_por_cidade_ignora_caixa() {
        let (mut store, _dir) = store_de_teste();
        registrar_usuario(&mut store, "Ana", "Silva", "a@x.com", "Cidade Y").unwrap();
        registrar_usuario(&mut store, "Bia", "Souza", "b@x.com", "Cidade Z").unwrap();

        let na_cidade = usuarios_na_cidade(&store, "cidade y");
        assert_eq!(na_cidade.len(), 1);
        assert_eq!(na_cidade[0].nome, "Ana");
    }

    #[test]
    fn listar_preserva_a_ordem_de_cadastro() {
        let (mut store, _dir) = store_de_teste();
        registrar_usuario(&mut store, "Ana", "Silva", "a@x.com", "Cidade Y").unwrap();
        registrar_usuario(&mut store, "Bia", "Souza", "b@x.com", "Cidade Z").unwrap();

        let nomes: Vec<_> = listar_usuarios(&store).iter().map(|u| u.nome.as_str()).collect();
        assert_eq!(nomes, ["Ana", "Bia"]);
    }
}
