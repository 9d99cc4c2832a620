// src/timeline.rs
//
// Linha do tempo da frota: normalização de datas e placas, classificação
// de eventos, fusão de contratos, pareamento de etapas de oficina e o
// consolidado por veículo / frota. Tudo síncrono e sem I/O.

pub mod aliases;
pub mod contracts;
pub mod dates;
pub mod events;
pub mod fleet;
pub mod format;
pub mod maintenance;
pub mod normalize;

pub use aliases::{extract_data_compra, extract_data_venda, extract_vehicle_dates};
pub use contracts::{build_contract_intervals, calc_dias_locado_from_contratos, merge_intervals};
pub use dates::{parse_date_any, parse_date_str};
pub use events::{calc_state_durations_days, event_to_state, get_event_date};
pub use fleet::{aggregate_fleet_metrics, aggregate_fleet_metrics_with};
pub use format::{DurationLocale, format_duration_days, format_duration_days_in};
pub use maintenance::{StageKeywords, calc_dias_manutencao_from_os, calc_dias_manutencao_with};
pub use normalize::{normalize_event_name, normalize_placa_key};
