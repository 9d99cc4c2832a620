// src/timeline/aliases.rs
//
// As exportações do warehouse não têm esquema fixo: o mesmo campo lógico
// aparece com nomes e capitalizações diferentes. Cada lista abaixo é
// consultada em ordem e o primeiro valor utilizável vence. Drift de esquema
// se corrige acrescentando um nome na lista certa.

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::{
    models::fleet::{RawRecord, VehicleDates},
    timeline::{
        dates::parse_date_any,
        normalize::{normalize_placa_key, value_as_text},
    },
};

pub const PLACA_ALIASES: &[&str] = &["Placa", "placa", "PLACA", "PlacaVeiculo", "placa_veiculo"];

pub const DATA_COMPRA_ALIASES: &[&str] = &[
    "DataCompra",
    "dataCompra",
    "data_compra",
    "DATA_COMPRA",
    "DataAquisicao",
    "DataEntradaFrota",
];

pub const DATA_VENDA_ALIASES: &[&str] = &[
    "DataVenda",
    "dataVenda",
    "data_venda",
    "DATA_VENDA",
    "DataBaixa",
    "DataSaidaFrota",
];

pub const EVENTO_DATA_ALIASES: &[&str] = &[
    "DataEvento",
    "Data",
    "data_evento",
    "data",
    "DataMovimentacao",
    "DataHora",
];

pub const EVENTO_TIPO_ALIASES: &[&str] = &[
    "TipoEvento",
    "Evento",
    "tipo_evento",
    "evento",
    "Status",
    "StatusEvento",
];

pub const CONTRATO_INICIO_ALIASES: &[&str] = &[
    "DataInicio",
    "DataInicial",
    "DataRetirada",
    "InicioContrato",
    "DataInicioContrato",
    "data_inicio",
    "dataInicio",
];

pub const CONTRATO_FIM_ALIASES: &[&str] = &[
    "DataFim",
    "DataFinal",
    "DataDevolucao",
    "FimContrato",
    "DataFimContrato",
    "DataTermino",
    "data_fim",
    "dataFim",
];

pub const OCORRENCIA_ALIASES: &[&str] = &[
    "Ocorrencia",
    "OcorrenciaId",
    "MovimentacaoId",
    "Id",
    "IdOcorrencia",
];

pub const ETAPA_ALIASES: &[&str] = &[
    "Etapa",
    "EtapaAtual",
    "etapa",
    "Status",
    "StatusOcorrencia",
    "Descricao",
];

pub const ETAPA_DATA_ALIASES: &[&str] = &[
    "DataEtapa",
    "DataMovimentacao",
    "DataEvento",
    "Data",
    "data",
    "DataAtualizacao",
    "DataCriacao",
];

/// Primeiro valor não nulo entre os aliases.
pub fn probe<'a>(record: &'a RawRecord, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}

pub fn probe_text(record: &RawRecord, aliases: &[&str]) -> Option<String> {
    probe(record, aliases).and_then(value_as_text)
}

/// Diferente de `probe`: um alias presente mas ilegível não bloqueia os
/// seguintes. Vence o primeiro que vira data.
pub fn probe_date(record: &RawRecord, aliases: &[&str]) -> Option<NaiveDateTime> {
    aliases
        .iter()
        .filter_map(|key| record.get(*key))
        .find_map(parse_date_any)
}

/// Chave de placa normalizada, ou `None` se o registro não tem placa útil.
pub fn extract_placa_key(record: &RawRecord) -> Option<String> {
    probe_text(record, PLACA_ALIASES)
        .map(|placa| normalize_placa_key(&placa))
        .filter(|key| !key.is_empty())
}

pub fn extract_data_compra(veiculo: &RawRecord) -> Option<NaiveDateTime> {
    probe_date(veiculo, DATA_COMPRA_ALIASES)
}

pub fn extract_data_venda(veiculo: &RawRecord) -> Option<NaiveDateTime> {
    probe_date(veiculo, DATA_VENDA_ALIASES)
}

pub fn extract_vehicle_dates(veiculo: &RawRecord) -> VehicleDates {
    VehicleDates {
        data_compra: extract_data_compra(veiculo),
        data_venda: extract_data_venda(veiculo),
    }
}
