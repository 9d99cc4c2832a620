// src/timeline/fleet.rs

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::{
    models::fleet::{FleetMetrics, FleetReport, FleetSnapshot, Lifetime, RawRecord, VehicleMetrics, span_days},
    timeline::{
        aliases::{extract_placa_key, extract_vehicle_dates},
        contracts::calc_dias_locado_from_contratos,
        maintenance::{StageKeywords, calc_dias_manutencao_with},
    },
};

/// Indexa registros pela placa normalizada. Registros sem placa ficam de fora.
fn index_by_placa(registros: &[RawRecord]) -> HashMap<String, Vec<&RawRecord>> {
    let mut indice: HashMap<String, Vec<&RawRecord>> = HashMap::new();
    for registro in registros {
        if let Some(placa) = extract_placa_key(registro) {
            indice.entry(placa).or_default().push(registro);
        }
    }
    indice
}

pub fn aggregate_fleet_metrics(snapshot: &FleetSnapshot, now: NaiveDateTime) -> FleetReport {
    aggregate_fleet_metrics_with(snapshot, now, &StageKeywords::default())
}

pub fn aggregate_fleet_metrics_with(
    snapshot: &FleetSnapshot,
    now: NaiveDateTime,
    keywords: &StageKeywords,
) -> FleetReport {
    let contratos = index_by_placa(&snapshot.contratos);

    // Movimentações, quando existem, são a fonte preferida para oficina.
    let fonte_oficina = match snapshot.movimentacoes.as_deref() {
        Some(movs) if !movs.is_empty() => movs,
        _ => snapshot.manutencoes.as_slice(),
    };
    let oficina = index_by_placa(fonte_oficina);

    let vazio: Vec<&RawRecord> = Vec::new();
    let mut veiculos = Vec::with_capacity(snapshot.frota.len());

    for veiculo in &snapshot.frota {
        let Some(placa) = extract_placa_key(veiculo) else {
            continue;
        };

        let datas = extract_vehicle_dates(veiculo);
        let fim_vida = datas.data_venda.unwrap_or(now);
        let vida = Lifetime { start: datas.data_compra, end: Some(fim_vida) };

        let contratos_veiculo = contratos.get(&placa).unwrap_or(&vazio);
        let dias_vida = datas
            .data_compra
            .map(|compra| span_days(compra, fim_vida).max(0.0))
            .unwrap_or(0.0);

        // Locado nunca passa da vida útil; sem data de compra a vida é 0 e o locado também.
        let dias_locado = calc_dias_locado_from_contratos(contratos_veiculo.iter().copied(), now, vida)
            .min(dias_vida);
        let dias_parado = dias_vida - dias_locado;

        let registros_oficina = oficina.get(&placa).unwrap_or(&vazio);
        let dias_manutencao = calc_dias_manutencao_with(registros_oficina.iter().copied(), now, keywords);

        let percentual_utilizacao = if dias_vida > 0.0 {
            (dias_locado / dias_vida * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        tracing::debug!(
            %placa,
            contratos = contratos_veiculo.len(),
            registros_oficina = registros_oficina.len(),
            dias_vida,
            dias_locado,
            dias_manutencao,
            "métricas do veículo calculadas"
        );

        veiculos.push(VehicleMetrics {
            placa,
            data_compra: datas.data_compra,
            data_venda: datas.data_venda,
            dias_vida,
            dias_locado,
            dias_manutencao,
            dias_parado,
            percentual_utilizacao,
        });
    }

    let frota = roll_up(&veiculos);
    FleetReport { veiculos, frota }
}

fn roll_up(veiculos: &[VehicleMetrics]) -> FleetMetrics {
    let total = veiculos.len();
    if total == 0 {
        return FleetMetrics::default();
    }

    let soma = |f: fn(&VehicleMetrics) -> f64| veiculos.iter().map(f).sum::<f64>();
    let total_dias_vida = soma(|v| v.dias_vida);
    let total_dias_locado = soma(|v| v.dias_locado);
    let total_dias_manutencao = soma(|v| v.dias_manutencao);
    let total_dias_parado = soma(|v| v.dias_parado);

    let n = total as f64;
    let base_utilizacao = total_dias_locado + total_dias_parado;

    FleetMetrics {
        total_veiculos: total,
        total_dias_vida,
        total_dias_locado,
        total_dias_manutencao,
        total_dias_parado,
        media_dias_vida: total_dias_vida / n,
        media_dias_locado: total_dias_locado / n,
        media_dias_manutencao: total_dias_manutencao / n,
        media_dias_parado: total_dias_parado / n,
        utilizacao_pct: if base_utilizacao > 0.0 {
            total_dias_locado / base_utilizacao * 100.0
        } else {
            0.0
        },
    }
}
