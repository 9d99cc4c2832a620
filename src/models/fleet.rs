// src/models/fleet.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Registro "solto" vindo do BaaS / warehouse. Os nomes de campo variam
/// entre exportações, então só é lido através dos resolvedores de alias.
pub type RawRecord = Map<String, Value>;

pub const MS_POR_DIA: f64 = 86_400_000.0;

/// Dias (fracionários) entre dois instantes. Negativo se `end < start`.
pub fn span_days(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    (end - start).num_milliseconds() as f64 / MS_POR_DIA
}

// --- ENUMS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleState {
    Locacao,    // Locado
    Manutencao, // Em oficina
    Sinistro,   // Acidente / sinistro
    Multa,      // Infração
    Outro,
}

// --- INTERVALOS ---

/// Intervalo fechado de tempo local. Só existe com `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    pub fn days(&self) -> f64 {
        span_days(self.start, self.end)
    }
}

/// Limites de vida útil do veículo usados para recortar os contratos.
/// `None` em qualquer ponta significa "sem limite".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lifetime {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

// --- RESULTADOS ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDurations {
    pub total_days: f64,
    pub locacao_days: f64,
    pub manutencao_days: f64,
    pub sinistro_days: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDates {
    pub data_compra: Option<NaiveDateTime>,
    pub data_venda: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleMetrics {
    pub placa: String,
    pub data_compra: Option<NaiveDateTime>,
    pub data_venda: Option<NaiveDateTime>,
    pub dias_vida: f64,
    pub dias_locado: f64,
    pub dias_manutencao: f64,
    pub dias_parado: f64,
    pub percentual_utilizacao: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetMetrics {
    pub total_veiculos: usize,
    pub total_dias_vida: f64,
    pub total_dias_locado: f64,
    pub total_dias_manutencao: f64,
    pub total_dias_parado: f64,
    pub media_dias_vida: f64,
    pub media_dias_locado: f64,
    pub media_dias_manutencao: f64,
    pub media_dias_parado: f64,
    pub utilizacao_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FleetReport {
    pub veiculos: Vec<VehicleMetrics>,
    pub frota: FleetMetrics,
}

/// Os arrays que a UI já buscou no backend, entregues de uma vez.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSnapshot {
    #[serde(default)]
    pub frota: Vec<RawRecord>,
    #[serde(default)]
    pub contratos: Vec<RawRecord>,
    #[serde(default)]
    pub manutencoes: Vec<RawRecord>,
    // Quando presente e não vazio, substitui `manutencoes` no cálculo de oficina.
    #[serde(default)]
    pub movimentacoes: Option<Vec<RawRecord>>,
}

// --- VIEWS (respostas HTTP) ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleMetricsView {
    #[serde(flatten)]
    pub metricas: VehicleMetrics,
    pub vida_formatada: String,
    pub locado_formatado: String,
    pub manutencao_formatada: String,
    pub parado_formatado: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetReportView {
    pub veiculos: Vec<VehicleMetricsView>,
    pub frota: FleetMetrics,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedEvent {
    pub data: Option<NaiveDateTime>,
    pub estado: Option<VehicleState>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateDurationsView {
    pub duracoes: StateDurations,
    pub eventos: Vec<ClassifiedEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePlateDates {
    pub placa: String,
    #[serde(flatten)]
    pub datas: VehicleDates,
}
