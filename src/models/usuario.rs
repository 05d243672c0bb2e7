// src/models/usuario.rs
use crate::error::{AppError, AppResult};

/// Representa um usuário cadastrado no sistema.
///
/// O `id` é atribuído pelo `Store` (contador sequencial iniciado em 1) e
/// nunca é gravado em `users.data`: ao recarregar o arquivo os ids são
/// reatribuídos pela posição da linha. Isso significa que ids NÃO são
/// estáveis entre execuções — defeito conhecido, ver DESIGN.md.
#[derive(Debug, Clone, PartialEq)]
pub struct Usuario {
    pub id: u32,
    pub nome: String,
    pub sobrenome: String,
    pub email: String,
    pub cidade: String,
}

impl Usuario {
    pub fn novo(id: u32, nome: &str, sobrenome: &str, email: &str, cidade: &str) -> Self {
        Self {
            id,
            nome: nome.to_string(),
            sobrenome: sobrenome.to_string(),
            email: email.to_string(),
            cidade: cidade.to_string(),
        }
    }

    pub fn nome_completo(&self) -> String {
        format!("{} {}", self.nome, self.sobrenome)
    }

    /// Converte o usuário para uma linha de `users.data`. O id fica de fora
    /// de propósito (ver comentário do struct).
    pub fn to_file_string(&self) -> String {
        format!(
            "{};{};{};{}",
            self.nome, self.sobrenome, self.email, self.cidade
        )
    }

    /// Reconstrói um usuário a partir de uma linha de `users.data`. O id é
    /// fornecido pelo chamador (o `Store`, a partir da posição no arquivo).
    pub fn from_file_string(linha: &str, id: u32) -> AppResult<Self> {
        let partes: Vec<&str> = linha.split(';').collect();
        if partes.len() != 4 {
            return Err(AppError::RegistroMalformado(format!(
                "linha de usuário com {} campos (esperados 4): {:?}",
                partes.len(),
                linha
            )));
        }
        Ok(Self::novo(id, partes[0], partes[1], partes[2], partes[3]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ida_e_volta_preserva_os_campos() {
        let usuario = Usuario::novo(7, "Ana", "Silva", "a@x.com", "Cidade Y");
        let linha = usuario.to_file_string();
        assert_eq!(linha, "Ana;Silva;a@x.com;Cidade Y");

        // O id não participa da codificação; quem chama escolhe outro.
        let relido = Usuario::from_file_string(&linha, 1).unwrap();
        assert_eq!(relido.nome, usuario.nome);
        assert_eq!(relido.sobrenome, usuario.sobrenome);
        assert_eq!(relido.email, usuario.email);
        assert_eq!(relido.cidade, usuario.cidade);
        assert_eq!(relido.id, 1);
    }

    #[test]
    fn nome_completo_junta_nome_e_sobrenome() {
        let usuario = Usuario::novo(1, "Ana", "Silva", "a@x.com", "Cidade Y");
        assert_eq!(usuario.nome_completo(), "Ana Silva");
    }

    #[test]
    fn linha_com_campos_demais_e_rejeitada() {
        let erro = Usuario::from_file_string("Ana;Silva;a@x.com;Cidade Y;extra", 1);
        assert!(matches!(erro, Err(crate::error::AppError::RegistroMalformado(_))));
    }

    #[test]
    fn linha_com_campos_de_menos_e_rejeitada() {
        let erro = Usuario::from_file_string("Ana;Silva", 1);
        assert!(matches!(erro, Err(crate::error::AppError::RegistroMalformado(_))));
    }
}
