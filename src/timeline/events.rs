// src/timeline/events.rs

use chrono::NaiveDateTime;

use crate::{
    models::fleet::{ClassifiedEvent, RawRecord, StateDurations, VehicleState, span_days},
    timeline::{
        aliases::{EVENTO_DATA_ALIASES, EVENTO_TIPO_ALIASES, probe, probe_date},
        normalize::{normalize_event_name, value_as_text},
    },
};

/// Regras de classificação, avaliadas nesta ordem. A primeira que casar vence.
pub const STATE_RULES: &[(VehicleState, &[&str])] = &[
    (VehicleState::Locacao, &["LOCAC", "ALUGUEL", "RETIRADA"]),
    (VehicleState::Manutencao, &["MANUT", "OFICINA", "REPARO", "SERVICO"]),
    (VehicleState::Sinistro, &["SINIST", "ACIDENT", "COLISAO", "BATIDA"]),
    (VehicleState::Multa, &["MULTA", "INFRAC"]),
];

pub fn get_event_date(evento: &RawRecord) -> Option<NaiveDateTime> {
    probe_date(evento, EVENTO_DATA_ALIASES)
}

/// Tipo do evento já normalizado. `None` se o campo falta ou está em branco.
pub fn get_event_type(evento: &RawRecord) -> Option<String> {
    probe(evento, EVENTO_TIPO_ALIASES)
        .and_then(value_as_text)
        .filter(|tipo| !tipo.is_empty())
        .map(|tipo| normalize_event_name(&tipo))
}

/// Classifica um nome de evento já normalizado.
pub fn classify_event_name(nome: &str) -> VehicleState {
    STATE_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| nome.contains(k)))
        .map(|(state, _)| *state)
        .unwrap_or(VehicleState::Outro)
}

pub fn event_to_state(evento: &RawRecord) -> Option<VehicleState> {
    get_event_type(evento).map(|nome| classify_event_name(&nome))
}

pub fn classify_events<'a, I>(eventos: I) -> Vec<ClassifiedEvent>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    eventos
        .into_iter()
        .map(|evento| ClassifiedEvent {
            data: get_event_date(evento),
            estado: event_to_state(evento),
        })
        .collect()
}

/// Tempo em cada estado a partir de um fluxo misto de eventos.
///
/// Cada evento abre um intervalo que fecha no evento seguinte (ou em `now`
/// para o último). Eventos sem data são descartados; eventos sem tipo
/// continuam delimitando intervalos mas não somam em nenhum balde.
pub fn calc_state_durations_days<'a, I>(eventos: I, now: NaiveDateTime) -> StateDurations
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut datados: Vec<(NaiveDateTime, Option<VehicleState>)> = eventos
        .into_iter()
        .filter_map(|evento| get_event_date(evento).map(|data| (data, event_to_state(evento))))
        .collect();

    if datados.is_empty() {
        return StateDurations::default();
    }

    datados.sort_by_key(|(data, _)| *data);

    let mut duracoes = StateDurations {
        total_days: span_days(datados[0].0, now).max(0.0),
        ..Default::default()
    };

    for (i, (inicio, estado)) in datados.iter().enumerate() {
        let fim = datados.get(i + 1).map(|(data, _)| *data).unwrap_or(now);
        let dias = span_days(*inicio, fim).max(0.0);

        match estado {
            Some(VehicleState::Locacao) => duracoes.locacao_days += dias,
            Some(VehicleState::Manutencao) => duracoes.manutencao_days += dias,
            Some(VehicleState::Sinistro) => duracoes.sinistro_days += dias,
            _ => {}
        }
    }

    tracing::trace!(
        eventos = datados.len(),
        total = duracoes.total_days,
        "durações por estado calculadas"
    );

    duracoes
}
