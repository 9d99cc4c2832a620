// src/config.rs

use std::{env, net::SocketAddr};

use anyhow::Context;

use crate::{services::FleetService, timeline::StageKeywords};

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    // Etapas extras de oficina, somadas às padrão
    pub etapas_chegada: Vec<String>,
    pub etapas_retirada: Vec<String>,
}

impl Config {
    /// Lê o `.env` (se existir) e as variáveis de ambiente.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let addr_raw = env::var("FROTA_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let addr = addr_raw
            .parse()
            .with_context(|| format!("FROTA_ADDR inválido: {}", addr_raw))?;

        Ok(Self {
            addr,
            etapas_chegada: parse_list(&env::var("FROTA_ETAPAS_CHEGADA").unwrap_or_default()),
            etapas_retirada: parse_list(&env::var("FROTA_ETAPAS_RETIRADA").unwrap_or_default()),
        })
    }

    pub fn stage_keywords(&self) -> StageKeywords {
        StageKeywords::default().with_extra(self.etapas_chegada.clone(), self.etapas_retirada.clone())
    }
}

// "NA OFICINA, em reparo" -> ["NA OFICINA", "em reparo"]
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub fleet_service: FleetService,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let keywords = config.stage_keywords();
        tracing::info!(
            chegada = keywords.chegada.len(),
            retirada = keywords.retirada.len(),
            "✅ Palavras-chave de etapas carregadas"
        );

        Self {
            fleet_service: FleetService::new(keywords),
        }
    }
}
