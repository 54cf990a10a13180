// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

const DEFAULT_LANG: &str = "en";

// Extrator de idioma a partir do Accept-Language
#[derive(Debug, Clone)]
pub struct Locale(pub String);

/// "pt-BR,en;q=0.8" -> "pt"
pub fn primary_language(header_str: &str) -> Option<String> {
    accept_language::parse(header_str)
        .first()
        .map(|tag| tag.split('-').next().unwrap_or(tag).to_ascii_lowercase())
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let lang = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(primary_language)
            .unwrap_or_else(|| DEFAULT_LANG.to_string());

        Ok(Locale(lang))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_primary_subtag_of_best_match() {
        assert_eq!(primary_language("pt-BR,en;q=0.8").as_deref(), Some("pt"));
        assert_eq!(primary_language("en;q=0.5, pt;q=0.9").as_deref(), Some("pt"));
    }
}
