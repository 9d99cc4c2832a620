// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::timeline::DurationLocale;

// Idioma do cliente, a partir do Accept-Language. Padrão: português.
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl Locale {
    pub fn is_pt(&self) -> bool {
        self.0 != "en"
    }

    pub fn duration_locale(&self) -> DurationLocale {
        DurationLocale::from_lang(&self.0)
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let default_lang = "pt".to_string();

        let lang = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(|header_str| {
                accept_language::parse(header_str)
                    .first() // Pega o primeiro idioma (ex: "pt-BR")
                    .map(|tag_string| {
                        // "pt-BR" -> "pt"
                        tag_string.split('-').next().unwrap_or(tag_string).to_lowercase()
                    })
            })
            .unwrap_or(default_lang);

        Ok(Locale(lang))
    }
}
