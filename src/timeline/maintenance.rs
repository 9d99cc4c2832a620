// src/timeline/maintenance.rs
//
// Registros de oficina chegam como transições de etapa por ocorrência, não
// como pares início/fim. O tempo parado é reconstruído casando a etapa de
// chegada com a próxima etapa de retirada dentro da mesma ocorrência.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::{
    models::fleet::{Interval, RawRecord},
    timeline::{
        aliases::{ETAPA_ALIASES, ETAPA_DATA_ALIASES, OCORRENCIA_ALIASES, extract_placa_key, probe_date, probe_text},
        normalize::normalize_event_name,
    },
};

pub const ETAPAS_CHEGADA_PADRAO: &[&str] = &["AGUARDANDO CHEGADA", "CHEG", "ENTR", "RECEB"];

pub const ETAPAS_RETIRADA_PADRAO: &[&str] = &[
    "AGUARDANDO RETIRADA DO VEICULO",
    "AGUARDANDO RETIRADA",
    "RETIR",
    "SAIDA",
    "CONCLUI",
    "LIBERAD",
];

/// Palavras-chave das etapas do fluxo de oficina. É um contrato com o
/// sistema de origem, por isso fica em configuração e não no algoritmo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageKeywords {
    pub chegada: Vec<String>,
    pub retirada: Vec<String>,
}

impl Default for StageKeywords {
    fn default() -> Self {
        Self {
            chegada: ETAPAS_CHEGADA_PADRAO.iter().map(|s| s.to_string()).collect(),
            retirada: ETAPAS_RETIRADA_PADRAO.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl StageKeywords {
    /// Acrescenta palavras-chave extras (normalizadas, sem duplicar).
    pub fn with_extra<C, R>(mut self, chegada: C, retirada: R) -> Self
    where
        C: IntoIterator<Item = String>,
        R: IntoIterator<Item = String>,
    {
        push_unique(&mut self.chegada, chegada);
        push_unique(&mut self.retirada, retirada);
        self
    }

    pub fn is_arrival(&self, etapa: &str) -> bool {
        self.chegada.iter().any(|k| etapa.contains(k.as_str()))
    }

    pub fn is_departure(&self, etapa: &str) -> bool {
        self.retirada.iter().any(|k| etapa.contains(k.as_str()))
    }
}

fn push_unique<I: IntoIterator<Item = String>>(lista: &mut Vec<String>, extras: I) {
    for extra in extras {
        let extra = normalize_event_name(extra.trim());
        if !extra.is_empty() && !lista.contains(&extra) {
            lista.push(extra);
        }
    }
}

#[derive(Debug, Clone)]
struct Stage {
    etapa: String,
    data: NaiveDateTime,
}

/// Agrupa por ocorrência. Registro sem chave vira um grupo só dele.
fn group_by_occurrence<'a, I>(registros: I) -> BTreeMap<String, Vec<Stage>>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut grupos: BTreeMap<String, Vec<Stage>> = BTreeMap::new();

    for (idx, registro) in registros.into_iter().enumerate() {
        let Some(data) = probe_date(registro, ETAPA_DATA_ALIASES) else {
            continue;
        };

        let chave = probe_text(registro, OCORRENCIA_ALIASES)
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| {
                let placa = extract_placa_key(registro).unwrap_or_else(|| "SEM_PLACA".to_string());
                format!("{placa}#{idx}")
            });

        let etapa = probe_text(registro, ETAPA_ALIASES)
            .map(|e| normalize_event_name(&e))
            .unwrap_or_default();

        grupos.entry(chave).or_default().push(Stage { etapa, data });
    }

    for etapas in grupos.values_mut() {
        etapas.sort_by_key(|s| s.data);
    }
    grupos
}

pub fn build_maintenance_intervals<'a, I>(
    registros: I,
    now: NaiveDateTime,
    keywords: &StageKeywords,
) -> Vec<Interval>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut intervals = Vec::new();

    for (ocorrencia, etapas) in group_by_occurrence(registros) {
        for (i, etapa) in etapas.iter().enumerate() {
            if !keywords.is_arrival(&etapa.etapa) {
                continue;
            }

            let saida = etapas[i + 1..]
                .iter()
                .find(|s| keywords.is_departure(&s.etapa))
                .map(|s| s.data);

            if saida.is_none() {
                tracing::trace!(%ocorrencia, chegada = %etapa.data, "ocorrência ainda aberta");
            }

            if let Some(interval) = Interval::new(etapa.data, saida.unwrap_or(now)) {
                intervals.push(interval);
            }
        }
    }

    intervals
}

pub fn calc_dias_manutencao_with<'a, I>(
    registros: I,
    now: NaiveDateTime,
    keywords: &StageKeywords,
) -> f64
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    build_maintenance_intervals(registros, now, keywords)
        .iter()
        .map(Interval::days)
        .sum()
}

/// Dias em oficina com as palavras-chave padrão.
pub fn calc_dias_manutencao_from_os<'a, I>(registros: I, now: NaiveDateTime) -> f64
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    calc_dias_manutencao_with(registros, now, &StageKeywords::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::{Value, json};

    fn record(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn test_arrival_paired_with_departure() {
        let registros = vec![
            record(json!({"Ocorrencia": "OS-1", "Etapa": "Aguardando Retirada do Veículo", "DataEtapa": "2023-03-06"})),
            record(json!({"Ocorrencia": "OS-1", "Etapa": "Aguardando Chegada", "DataEtapa": "2023-03-01"})),
        ];
        let dias = calc_dias_manutencao_from_os(&registros, day(2023, 12, 31));
        assert_eq!(dias, 5.0);
    }

    #[test]
    fn test_open_occurrence_runs_until_now() {
        let registros = vec![record(json!({"OcorrenciaId": 77, "Etapa": "AGUARDANDO CHEGADA", "Data": "2023-03-01"}))];
        let dias = calc_dias_manutencao_from_os(&registros, day(2023, 3, 8));
        assert_eq!(dias, 7.0);
    }

    #[test]
    fn test_departure_must_be_in_same_occurrence() {
        let registros = vec![
            record(json!({"Ocorrencia": "A", "Etapa": "Entrada", "Data": "2023-03-01"})),
            record(json!({"Ocorrencia": "B", "Etapa": "Liberado", "Data": "2023-03-02"})),
        ];
        let dias = calc_dias_manutencao_from_os(&registros, day(2023, 3, 11));
        assert_eq!(dias, 10.0);
    }

    #[test]
    fn test_departure_before_arrival_is_not_used() {
        let registros = vec![
            record(json!({"Ocorrencia": "A", "Etapa": "Saída", "Data": "2023-03-01"})),
            record(json!({"Ocorrencia": "A", "Etapa": "Recebido", "Data": "2023-03-02"})),
            record(json!({"Ocorrencia": "A", "Etapa": "Concluído", "Data": "2023-03-05"})),
        ];
        let dias = calc_dias_manutencao_from_os(&registros, day(2023, 12, 31));
        assert_eq!(dias, 3.0);
    }

    #[test]
    fn test_multiple_occurrences_sum() {
        let registros = vec![
            record(json!({"Ocorrencia": 1, "Etapa": "Chegada", "Data": "01/01/2023"})),
            record(json!({"Ocorrencia": 1, "Etapa": "Retirada", "Data": "03/01/2023"})),
            record(json!({"Ocorrencia": 2, "Etapa": "Chegada", "Data": "10/01/2023"})),
            record(json!({"Ocorrencia": 2, "Etapa": "Em reparo", "Data": "11/01/2023"})),
            record(json!({"Ocorrencia": 2, "Etapa": "Liberado", "Data": "14/01/2023"})),
        ];
        let dias = calc_dias_manutencao_from_os(&registros, day(2023, 12, 31));
        assert_eq!(dias, 6.0);
    }

    #[test]
    fn test_records_without_key_or_date() {
        let registros = vec![
            // Sem chave: cada registro é um grupo isolado, a chegada fica aberta
            record(json!({"Placa": "ABC1234", "Etapa": "Chegada", "Data": "2023-01-01"})),
            record(json!({"Placa": "ABC1234", "Etapa": "Retirada", "Data": "2023-01-02"})),
            // Sem data: ignorado
            record(json!({"Ocorrencia": "X", "Etapa": "Chegada"})),
        ];
        let dias = calc_dias_manutencao_from_os(&registros, day(2023, 1, 5));
        assert_eq!(dias, 4.0);
    }

    #[test]
    fn test_empty_input() {
        let vazio: Vec<RawRecord> = vec![];
        assert_eq!(calc_dias_manutencao_from_os(&vazio, day(2023, 1, 5)), 0.0);
    }

    #[test]
    fn test_stage_keywords_are_extensible() {
        let keywords = StageKeywords::default()
            .with_extra(vec!["na oficina".to_string()], vec!["devolvido".to_string(), "  ".to_string()]);

        assert!(keywords.is_arrival("VEICULO NA OFICINA"));
        assert!(keywords.is_departure("DEVOLVIDO AO CLIENTE"));
        assert!(!keywords.retirada.contains(&String::new()));

        let registros = vec![
            record(json!({"Ocorrencia": "Z", "Etapa": "Na oficina", "Data": "2023-02-01"})),
            record(json!({"Ocorrencia": "Z", "Etapa": "Devolvido", "Data": "2023-02-03"})),
        ];
        assert_eq!(calc_dias_manutencao_with(&registros, day(2023, 3, 1), &keywords), 2.0);
        // Com as palavras padrão nenhuma das etapas é reconhecida
        assert_eq!(calc_dias_manutencao_from_os(&registros, day(2023, 3, 1)), 0.0);
    }

    #[test]
    fn test_default_keywords_classify_labels() {
        let keywords = StageKeywords::default();
        assert!(keywords.is_arrival("AGUARDANDO CHEGADA"));
        assert!(!keywords.is_arrival("AGUARDANDO RETIRADA DO VEICULO"));
        assert!(keywords.is_departure("AGUARDANDO RETIRADA DO VEICULO"));
        assert!(keywords.is_departure("SAIDA"));
    }
}
