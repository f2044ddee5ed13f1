//! Configuração do Gardener carregada a partir de `gardener.toml`.
//!
//! A struct [`GardenerConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `GEMINI_API_KEY` tem precedência sobre o arquivo.

use anyhow::Result;
use std::path::Path;

use serde::Deserialize;

/// Configuração de nível superior carregada de `gardener.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct GardenerConfig {
    /// Chave da API Gemini.
    #[serde(default)]
    pub api_key: String,

    /// Identificador do modelo generativo usado para classificação.
    #[serde(default = "default_model")]
    pub model: String,

    /// Raiz do vault PARA no disco.
    #[serde(default = "default_vault_root")]
    pub vault_root: String,

    /// Simula as operações de arquivo sem mover/modificar nada.
    #[serde(default)]
    pub dry_run: bool,

    /// Aceita subpastas novas propostas pelo modelo, desde que fiquem
    /// estritamente sob uma das três categorias.
    #[serde(default = "default_allow_new_folders")]
    pub allow_new_folders: bool,
}

// Valor padrão para o modelo.
fn default_model() -> String {
    "gemini-1.5-flash-latest".to_string()
}

// Valor padrão para a raiz do vault: o diretório atual.
fn default_vault_root() -> String {
    ".".to_string()
}

// Subpastas novas são permitidas por padrão.
fn default_allow_new_folders() -> bool {
    true
}

impl Default for GardenerConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            vault_root: default_vault_root(),
            dry_run: false,
            allow_new_folders: default_allow_new_folders(),
        }
    }
}

impl GardenerConfig {
    /// Carrega a configuração de `gardener.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self> {
        let path = Path::new("gardener.toml");
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<GardenerConfig>(&contents)?
        } else {
            Self::default()
        };

        // Variável de ambiente tem precedência sobre o arquivo de configuração para a chave API.
        if let Ok(key) = std::env::var("GEMINI_API_KEY")
            && !key.is_empty()
        {
            config.api_key = key;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = GardenerConfig::default();
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "gemini-1.5-flash-latest");
        assert_eq!(config.vault_root, ".");
        assert!(!config.dry_run);
        assert!(config.allow_new_folders);
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            api_key = "ai-test-123"
            dry_run = true
        "#;
        let config: GardenerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_key, "ai-test-123");
        assert!(config.dry_run);
        assert_eq!(config.model, "gemini-1.5-flash-latest");
        assert!(config.allow_new_folders);
    }

    #[test]
    fn deserialize_full_toml() {
        let toml_str = r#"
            api_key = "ai-test-123"
            model = "gemini-1.5-pro"
            vault_root = "/srv/vault"
            dry_run = false
            allow_new_folders = false
        "#;
        let config: GardenerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.vault_root, "/srv/vault");
        assert!(!config.allow_new_folders);
    }

    #[test]
    fn load_falls_back_to_defaults() {
        // No ambiente de teste, tipicamente não há gardener.toml no diretório de trabalho.
        let config = GardenerConfig::load().unwrap();
        assert_eq!(config.vault_root, ".");
    }
}
