// src/handlers/fleet.rs

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::fleet::{FleetReportView, FleetSnapshot, RawRecord, VehicleMetricsView},
    timeline::{format_duration_days_in, parse_date_str},
};

// Teto por array, para não travar o servidor com um dump inteiro do warehouse.
const MAX_REGISTROS: u64 = 100_000;

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FleetMetricsPayload {
    #[serde(default)]
    #[validate(length(max = MAX_REGISTROS, message = "Registros demais"))]
    pub frota: Vec<RawRecord>,

    #[serde(default)]
    #[validate(length(max = MAX_REGISTROS, message = "Registros demais"))]
    pub contratos: Vec<RawRecord>,

    #[serde(default)]
    #[validate(length(max = MAX_REGISTROS, message = "Registros demais"))]
    pub manutencoes: Vec<RawRecord>,

    #[serde(default)]
    #[validate(length(max = MAX_REGISTROS, message = "Registros demais"))]
    pub movimentacoes: Option<Vec<RawRecord>>,

    // Instante de referência; ausente = agora (hora local)
    pub now: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StateDurationsPayload {
    #[serde(default)]
    #[validate(length(max = MAX_REGISTROS, message = "Registros demais"))]
    pub eventos: Vec<RawRecord>,

    pub now: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDatesPayload {
    #[serde(default)]
    #[validate(length(max = MAX_REGISTROS, message = "Registros demais"))]
    pub frota: Vec<RawRecord>,
}

fn resolve_now(now: Option<&str>) -> Result<NaiveDateTime, AppError> {
    match now {
        None => Ok(Local::now().naive_local()),
        Some(raw) => parse_date_str(raw).ok_or_else(|| AppError::InvalidReferenceDate(raw.to_string())),
    }
}

// =============================================================================
//  HANDLERS
// =============================================================================

// POST /api/frota/metricas
pub async fn post_metricas(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<FleetMetricsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let now = resolve_now(payload.now.as_deref())
        .map_err(|e| e.to_api_error(&locale))?;

    let snapshot = FleetSnapshot {
        frota: payload.frota,
        contratos: payload.contratos,
        manutencoes: payload.manutencoes,
        movimentacoes: payload.movimentacoes,
    };

    let report = app_state.fleet_service
        .metricas(snapshot, now)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    let formato = locale.duration_locale();
    let fmt = |dias: f64| format_duration_days_in(Some(dias), formato);

    let veiculos = report.veiculos
        .into_iter()
        .map(|metricas| VehicleMetricsView {
            vida_formatada: fmt(metricas.dias_vida),
            locado_formatado: fmt(metricas.dias_locado),
            manutencao_formatada: fmt(metricas.dias_manutencao),
            parado_formatado: fmt(metricas.dias_parado),
            metricas,
        })
        .collect();

    Ok((StatusCode::OK, Json(FleetReportView { veiculos, frota: report.frota })))
}

// POST /api/frota/eventos/duracoes
pub async fn post_duracoes(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<StateDurationsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let now = resolve_now(payload.now.as_deref())
        .map_err(|e| e.to_api_error(&locale))?;

    let view = app_state.fleet_service.duracoes(&payload.eventos, now);

    Ok((StatusCode::OK, Json(view)))
}

// POST /api/frota/veiculos/datas
pub async fn post_datas(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<VehicleDatesPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let datas = app_state.fleet_service.datas(&payload.frota);

    Ok((StatusCode::OK, Json(datas)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    use crate::{services::FleetService, timeline::StageKeywords};

    fn state() -> State<AppState> {
        State(AppState { fleet_service: FleetService::new(StageKeywords::default()) })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_post_metricas_formats_durations() {
        let payload: FleetMetricsPayload = serde_json::from_value(json!({
            "frota": [{"Placa": "ABC-1234", "DataCompra": "01/01/2023"}],
            "contratos": [{"Placa": "ABC1234", "DataInicio": "2023-01-01", "DataFim": "2023-02-15"}],
            "now": "2023-12-31"
        }))
        .unwrap();

        let response = post_metricas(state(), Locale("pt".into()), Json(payload))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let veiculo = &body["veiculos"][0];
        assert_eq!(veiculo["placa"], "ABC1234");
        assert_eq!(veiculo["diasLocado"], 45.0);
        assert_eq!(veiculo["locadoFormatado"], "1 m 15 d");
        assert_eq!(veiculo["dataCompra"], "2023-01-01T00:00:00");
        assert_eq!(body["frota"]["totalVeiculos"], 1);
    }

    #[tokio::test]
    async fn test_post_metricas_rejects_bad_reference_date() {
        let payload: FleetMetricsPayload = serde_json::from_value(json!({ "now": "amanhã" })).unwrap();

        let err = post_metricas(state(), Locale("en".into()), Json(payload))
            .await
            .err()
            .unwrap();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let body = body_json(err.into_response()).await;
        assert!(body["error"].as_str().unwrap().contains("amanhã"));
    }

    #[tokio::test]
    async fn test_post_metricas_rejects_oversized_array() {
        let payload = FleetMetricsPayload {
            frota: vec![RawRecord::new(); MAX_REGISTROS as usize + 1],
            contratos: vec![],
            manutencoes: vec![],
            movimentacoes: None,
            now: Some("2023-12-31".into()),
        };

        let err = post_metricas(state(), Locale("pt".into()), Json(payload))
            .await
            .err()
            .unwrap();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let body = body_json(err.into_response()).await;
        let msg = body["error"].as_str().unwrap();
        assert!(msg.starts_with("Campos inválidos"));
        assert!(msg.contains("frota"));
    }

    #[tokio::test]
    async fn test_post_datas_accepts_array_at_the_cap() {
        let payload = VehicleDatesPayload { frota: vec![RawRecord::new(); MAX_REGISTROS as usize] };

        let response = post_datas(state(), Locale("pt".into()), Json(payload))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_post_duracoes() {
        let payload: StateDurationsPayload = serde_json::from_value(json!({
            "eventos": [
                {"DataEvento": "2023-01-01", "TipoEvento": "Locação"},
                {"DataEvento": "2023-01-08", "TipoEvento": "Oficina"}
            ],
            "now": "2023-01-10"
        }))
        .unwrap();

        let response = post_duracoes(state(), Locale("pt".into()), Json(payload))
            .await
            .unwrap()
            .into_response();
        let body = body_json(response).await;

        assert_eq!(body["duracoes"]["locacaoDays"], 7.0);
        assert_eq!(body["duracoes"]["manutencaoDays"], 2.0);
        assert_eq!(body["duracoes"]["totalDays"], 9.0);
        assert_eq!(body["eventos"][1]["estado"], "MANUTENCAO");
    }

    #[tokio::test]
    async fn test_post_datas() {
        let payload: VehicleDatesPayload = serde_json::from_value(json!({
            "frota": [{"placa": "xyz 9876", "DataVenda": "2024-02-01"}, {}]
        }))
        .unwrap();

        let response = post_datas(state(), Locale("pt".into()), Json(payload))
            .await
            .unwrap()
            .into_response();
        let body = body_json(response).await;

        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["placa"], "XYZ9876");
        assert_eq!(body[0]["dataCompra"], Value::Null);
        assert_eq!(body[0]["dataVenda"], "2024-02-01T00:00:00");
    }
}
