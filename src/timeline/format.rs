// src/timeline/format.rs

const DIAS_POR_ANO: i64 = 365;
const DIAS_POR_MES: i64 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DurationLocale {
    #[default]
    Pt,
    En,
}

impl DurationLocale {
    /// "pt", "pt-BR" -> Pt; "en", "en-US" -> En; qualquer outro -> Pt.
    pub fn from_lang(lang: &str) -> Self {
        match lang.split('-').next().map(str::to_ascii_lowercase).as_deref() {
            Some("en") => DurationLocale::En,
            _ => DurationLocale::Pt,
        }
    }

    fn units(&self) -> [&'static str; 3] {
        match self {
            DurationLocale::Pt => ["a", "m", "d"],
            DurationLocale::En => ["y", "mo", "d"],
        }
    }
}

/// "1 a 2 m 5 d" com aproximação de 365/30 dias.
pub fn format_duration_days(dias: Option<f64>) -> String {
    format_duration_days_in(dias, DurationLocale::Pt)
}

pub fn format_duration_days_in(dias: Option<f64>, locale: DurationLocale) -> String {
    let Some(dias) = dias.filter(|d| d.is_finite()) else {
        return "—".to_string();
    };

    let [u_ano, u_mes, u_dia] = locale.units();
    let total = dias.max(0.0).round() as i64;
    if total == 0 {
        return format!("0 {u_dia}");
    }

    let anos = total / DIAS_POR_ANO;
    let meses = (total % DIAS_POR_ANO) / DIAS_POR_MES;
    let resto = (total % DIAS_POR_ANO) % DIAS_POR_MES;

    [(anos, u_ano), (meses, u_mes), (resto, u_dia)]
        .into_iter()
        .filter(|(valor, _)| *valor > 0)
        .map(|(valor, unidade)| format!("{valor} {unidade}"))
        .collect::<Vec<_>>()
        .join(" ")
}
