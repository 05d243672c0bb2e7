// src/store.rs
use crate::models::{evento::Evento, usuario::Usuario};
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

/// Guarda as coleções em memória e cuida da persistência em arquivo.
///
/// Cada mutação regrava o arquivo inteiro a partir da coleção em memória
/// (sem garantia de atomicidade além da escrita subjacente). Não há nenhum
/// tipo de lock: dois processos apontando para os mesmos arquivos vão se
/// sobrescrever. Uso previsto é um único usuário interativo local.
pub struct Store {
    pub eventos: Vec<Evento>,
    pub usuarios: Vec<Usuario>,
    proximo_id: u32,
    caminho_eventos: PathBuf,
    caminho_usuarios: PathBuf,
    caminho_presenca: PathBuf,
}

impl Store {
    /// Abre o store com os caminhos vindos do ambiente (`EVENTS_FILE`,
    /// `USERS_FILE`, `PRESENCE_FILE`; padrão `events.data`, `users.data` e
    /// `presenca.data` no diretório corrente) e carrega as coleções.
    pub fn abrir() -> Self {
        let caminho_eventos =
            std::env::var("EVENTS_FILE").unwrap_or_else(|_| "events.data".into());
        let caminho_usuarios =
            std::env::var("USERS_FILE").unwrap_or_else(|_| "users.data".into());
        let caminho_presenca =
            std::env::var("PRESENCE_FILE").unwrap_or_else(|_| "presenca.data".into());
        Self::com_arquivos(caminho_eventos, caminho_usuarios, caminho_presenca)
    }

    /// Abre o store com os três arquivos dentro de `dir`. Usado pelos testes.
    pub fn com_caminhos<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self::com_arquivos(
            dir.join("events.data"),
            dir.join("users.data"),
            dir.join("presenca.data"),
        )
    }

    fn com_arquivos(
        caminho_eventos: impl Into<PathBuf>,
        caminho_usuarios: impl Into<PathBuf>,
        caminho_presenca: impl Into<PathBuf>,
    ) -> Self {
        let mut store = Self {
            eventos: Vec::new(),
            usuarios: Vec::new(),
            proximo_id: 1,
            caminho_eventos: caminho_eventos.into(),
            caminho_usuarios: caminho_usuarios.into(),
            caminho_presenca: caminho_presenca.into(),
        };
        store.carregar_eventos();
        store.carregar_usuarios();
        store
    }

    pub fn caminho_presenca(&self) -> &Path {
        &self.caminho_presenca
    }

    /// Reserva o próximo id de usuário. O contador vale só para esta
    /// execução: na próxima carga os ids recomeçam em 1 pela posição no
    /// arquivo, então ids gravados em `presenca.data` podem colidir com
    /// usuários novos após um reinício. Defeito conhecido, ver DESIGN.md.
    pub fn alocar_id_usuario(&mut self) -> u32 {
        let id = self.proximo_id;
        self.proximo_id += 1;
        id
    }

    /// Carrega `events.data`. Arquivo ausente vira um arquivo vazio recém
    /// criado (não é erro). A primeira linha que não decodifica interrompe o
    /// restante do arquivo; o que já foi lido permanece. Nada aqui derruba o
    /// programa.
    fn carregar_eventos(&mut self) {
        let leitor = match abrir_ou_criar(&self.caminho_eventos) {
            Some(l) => l,
            None => return,
        };
        for linha in leitor.lines() {
            let linha = match linha {
                Ok(l) => l,
                Err(e) => {
                    tracing::error!("Erro ao carregar eventos: {}", e);
                    break;
                }
            };
            match Evento::from_file_string(&linha) {
                Ok(evento) => self.eventos.push(evento),
                Err(e) => {
                    tracing::error!("Erro ao carregar eventos: {}", e);
                    break;
                }
            }
        }
        tracing::debug!("{} eventos carregados.", self.eventos.len());
    }

    /// Carrega `users.data` com a mesma política de `carregar_eventos`.
    /// Os ids são reatribuídos sequencialmente pela ordem das linhas.
    fn carregar_usuarios(&mut self) {
        let leitor = match abrir_ou_criar(&self.caminho_usuarios) {
            Some(l) => l,
            None => return,
        };
        for linha in leitor.lines() {
            let linha = match linha {
                Ok(l) => l,
                Err(e) => {
                    tracing::error!("Erro ao carregar usuários: {}", e);
                    break;
                }
            };
            let id = self.proximo_id;
            match Usuario::from_file_string(&linha, id) {
                Ok(usuario) => {
                    self.proximo_id += 1;
                    self.usuarios.push(usuario);
                }
                Err(e) => {
                    tracing::error!("Erro ao carregar usuários: {}", e);
                    break;
                }
            }
        }
        tracing::debug!("{} usuários carregados.", self.usuarios.len());
    }

    /// Regrava `events.data` inteiro a partir da coleção em memória.
    pub fn salvar_eventos(&self) -> std::io::Result<()> {
        salvar_linhas(
            &self.caminho_eventos,
            self.eventos.iter().map(Evento::to_file_string),
        )
    }

    /// Regrava `users.data` inteiro a partir da coleção em memória.
    pub fn salvar_usuarios(&self) -> std::io::Result<()> {
        salvar_linhas(
            &self.caminho_usuarios,
            self.usuarios.iter().map(Usuario::to_file_string),
        )
    }
}

/// Abre o arquivo para leitura; se não existir, cria vazio e devolve `None`
/// (coleção começa vazia). Falhas de E/S são registradas e também devolvem
/// `None` — a carga nunca aborta o programa.
fn abrir_ou_criar(caminho: &Path) -> Option<BufReader<File>> {
    match File::open(caminho) {
        Ok(arquivo) => Some(BufReader::new(arquivo)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            if let Err(e) = File::create(caminho) {
                tracing::error!("Erro ao criar {}: {}", caminho.display(), e);
            }
            None
        }
        Err(e) => {
            tracing::error!("Erro ao abrir {}: {}", caminho.display(), e);
            None
        }
    }
}

fn salvar_linhas<I>(caminho: &Path, linhas: I) -> std::io::Result<()>
where
    I: Iterator<Item = String>,
{
    let arquivo = File::create(caminho)?;
    let mut escritor = BufWriter::new(arquivo);
    for linha in linhas {
        writeln!(escritor, "{}", linha)?;
    }
    escritor.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn arquivos_ausentes_sao_criados_vazios() {
        let dir = TempDir::new().unwrap();
        let store = Store::com_caminhos(dir.path());

        assert!(store.eventos.is_empty());
        assert!(store.usuarios.is_empty());
        assert!(dir.path().join("events.data").exists());
        assert!(dir.path().join("users.data").exists());
    }

    #[test]
    fn linha_malformada_interrompe_o_restante_do_arquivo() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("users.data"),
            "Ana;Silva;a@x.com;Cidade Y\nlinha quebrada\nBia;Souza;b@x.com;Cidade Z\n",
        )
        .unwrap();

        let store = Store::com_caminhos(dir.path());

        // Só a linha bem formada antes do erro sobrevive.
        assert_eq!(store.usuarios.len(), 1);
        assert_eq!(store.usuarios[0].nome, "Ana");
        assert_eq!(store.usuarios[0].id, 1);
    }

    #[test]
    fn ids_sao_reatribuidos_pela_posicao_no_arquivo() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("users.data"),
            "Ana;Silva;a@x.com;Cidade Y\nBia;Souza;b@x.com;Cidade Z\n",
        )
        .unwrap();

        let mut store = Store::com_caminhos(dir.path());
        assert_eq!(store.usuarios[0].id, 1);
        assert_eq!(store.usuarios[1].id, 2);
        // O contador continua de onde a carga parou.
        assert_eq!(store.alocar_id_usuario(), 3);
    }

    #[test]
    fn salvar_e_recarregar_eventos_regrava_o_arquivo_inteiro() {
        use crate::models::evento::Evento;
        use chrono::NaiveDate;

        let dir = TempDir::new().unwrap();
        let mut store = Store::com_caminhos(dir.path());
        let inicio = NaiveDate::from_ymd_opt(2030, 1, 1)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();
        let fim = NaiveDate::from_ymd_opt(2030, 1, 1)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        store.eventos.push(Evento::novo(
            "Show A", "Rua X", "Cidade Y", "shows", inicio, fim, "desc",
        ));
        store.salvar_eventos().unwrap();

        let relido = Store::com_caminhos(dir.path());
        assert_eq!(relido.eventos, store.eventos);
    }

    #[test]
    fn evento_malformado_preserva_o_prefixo_bem_formado() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("events.data"),
            "Show A;Rua X;Cidade Y;shows;01/01/2030 20:00;01/01/2030 23:00;desc\n\
             Show B;Rua Z;Cidade Y;shows;data ruim;01/02/2030 23:00;desc\n\
             Show C;Rua W;Cidade Y;shows;01/03/2030 20:00;01/03/2030 23:00;desc\n",
        )
        .unwrap();

        let store = Store::com_caminhos(dir.path());
        assert_eq!(store.eventos.len(), 1);
        assert_eq!(store.eventos[0].nome, "Show A");
    }
}
