// src/services/fleet_service.rs

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::{
    common::error::AppError,
    models::fleet::{FleetReport, FleetSnapshot, RawRecord, StateDurationsView, VehiclePlateDates},
    timeline::{
        StageKeywords, aggregate_fleet_metrics_with,
        aliases::{extract_placa_key, extract_vehicle_dates},
        calc_state_durations_days,
        events::classify_events,
    },
};

#[derive(Clone)]
pub struct FleetService {
    keywords: Arc<StageKeywords>,
}

impl FleetService {
    pub fn new(keywords: StageKeywords) -> Self {
        Self { keywords: Arc::new(keywords) }
    }

    pub fn keywords(&self) -> &StageKeywords {
        &self.keywords
    }

    /// Consolidado da frota. O cálculo é CPU puro, então roda fora do
    /// runtime (frotas grandes levam alguns milissegundos).
    pub async fn metricas(
        &self,
        snapshot: FleetSnapshot,
        now: NaiveDateTime,
    ) -> Result<FleetReport, AppError> {
        let keywords = Arc::clone(&self.keywords);

        let report = tokio::task::spawn_blocking(move || {
            aggregate_fleet_metrics_with(&snapshot, now, &keywords)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de métricas da frota: {}", e))?;

        tracing::info!(
            veiculos = report.frota.total_veiculos,
            utilizacao_pct = report.frota.utilizacao_pct,
            "📊 Métricas da frota calculadas"
        );

        Ok(report)
    }

    pub fn duracoes(&self, eventos: &[RawRecord], now: NaiveDateTime) -> StateDurationsView {
        StateDurationsView {
            duracoes: calc_state_durations_days(eventos, now),
            eventos: classify_events(eventos),
        }
    }

    /// Datas de compra/venda por veículo; veículos sem placa ficam de fora.
    pub fn datas(&self, frota: &[RawRecord]) -> Vec<VehiclePlateDates> {
        frota
            .iter()
            .filter_map(|veiculo| {
                extract_placa_key(veiculo).map(|placa| VehiclePlateDates {
                    placa,
                    datas: extract_vehicle_dates(veiculo),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_metricas_runs_aggregation() {
        let service = FleetService::new(StageKeywords::default());
        let snapshot: FleetSnapshot = serde_json::from_value(json!({
            "frota": [{"Placa": "ABC1234", "DataCompra": "2023-01-01"}],
            "contratos": [{"Placa": "ABC1234", "DataInicio": "2023-01-01", "DataFim": "2023-01-11"}]
        }))
        .unwrap();

        let report = service.metricas(snapshot, day(2023, 1, 21)).await.unwrap();
        assert_eq!(report.veiculos.len(), 1);
        assert_eq!(report.veiculos[0].dias_locado, 10.0);
        assert_eq!(report.frota.utilizacao_pct, 50.0);
    }

    #[test]
    fn test_datas_skips_vehicles_without_plate() {
        let service = FleetService::new(StageKeywords::default());
        let frota: Vec<RawRecord> = serde_json::from_value(json!([
            {"Placa": "abc 1234", "DataCompra": "10/05/2021"},
            {"Modelo": "Onix"}
        ]))
        .unwrap();

        let datas = service.datas(&frota);
        assert_eq!(datas.len(), 1);
        assert_eq!(datas[0].placa, "ABC1234");
        assert_eq!(datas[0].datas.data_compra, Some(day(2021, 5, 10)));
        assert_eq!(datas[0].datas.data_venda, None);
    }
}
