// src/timeline/contracts.rs

use chrono::NaiveDateTime;

use crate::{
    models::fleet::{Interval, Lifetime, RawRecord},
    timeline::aliases::{CONTRATO_FIM_ALIASES, CONTRATO_INICIO_ALIASES, probe_date},
};

/// Intervalos de locação já recortados pela vida útil e sem sobreposição.
///
/// Contrato sem início legível é ignorado; sem fim, fica aberto até `now`.
pub fn build_contract_intervals<'a, I>(
    contratos: I,
    now: NaiveDateTime,
    vida: Lifetime,
) -> Vec<Interval>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let brutos = contratos.into_iter().filter_map(|contrato| {
        let inicio = probe_date(contrato, CONTRATO_INICIO_ALIASES)?;
        let fim = probe_date(contrato, CONTRATO_FIM_ALIASES).unwrap_or(now);

        let inicio = vida.start.map_or(inicio, |limite| inicio.max(limite));
        let fim = vida.end.map_or(fim, |limite| fim.min(limite));

        Interval::new(inicio, fim)
    });

    merge_intervals(brutos.collect())
}

/// Varredura clássica: ordena por início e funde quem encosta ou sobrepõe.
pub fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_by_key(|i| i.start);

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for atual in intervals {
        match merged.last_mut() {
            Some(ultimo) if atual.start <= ultimo.end => {
                ultimo.end = ultimo.end.max(atual.end);
            }
            _ => merged.push(atual),
        }
    }
    merged
}

pub fn calc_dias_locado_from_contratos<'a, I>(
    contratos: I,
    now: NaiveDateTime,
    vida: Lifetime,
) -> f64
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    build_contract_intervals(contratos, now, vida)
        .iter()
        .map(Interval::days)
        .sum()
}
