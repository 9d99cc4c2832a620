// src/timeline/normalize.rs

use serde_json::Value;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// "abc-1234", "ABC 1234" e "ABC1234" viram a mesma chave.
pub fn normalize_placa_key(placa: &str) -> String {
    placa
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Maiúsculas sem acentos (NFD + remoção das marcas combinantes).
pub fn normalize_event_name(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_uppercase()
}

/// Texto de um valor JSON escalar. Números viram string (IDs numéricos
/// de ocorrência, placas exportadas como número etc).
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
