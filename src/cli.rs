//! Interface de linha de comando do Gardener baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (run, status, folders)
//! e flags globais (--vault, --model).

use clap::{Parser, Subcommand};

/// Gardener — triagem automática da caixa de entrada de um vault PARA.
#[derive(Debug, Parser)]
#[command(name = "gardener", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Raiz do vault (sobrepõe o valor de gardener.toml).
    #[arg(long, global = true)]
    pub vault: Option<String>,

    /// Modelo generativo a usar nesta execução.
    #[arg(long, global = true)]
    pub model: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Processa todos os arquivos da caixa de entrada.
    Run {
        /// Simula a execução sem mover nem modificar arquivos.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// Mostra quantos arquivos aguardam triagem na caixa de entrada.
    Status,

    /// Lista as pastas de destino válidas do vault.
    Folders,
}
