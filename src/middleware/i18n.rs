// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

// Idiomas com mensagens traduzidas; o primeiro é o padrão.
const SUPPORTED_LANGUAGES: [&str; 2] = ["es", "en"];

// Nosso extrator de idioma
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Locale {
    pub fn is_english(&self) -> bool {
        self.0 == "en"
    }

    /// Escolhe entre a versão em espanhol e a em inglês de uma mensagem.
    pub fn text(&self, es: &str, en: &str) -> String {
        if self.is_english() { en.to_string() } else { es.to_string() }
    }

    /// Escolhe o melhor idioma suportado a partir de um cabeçalho Accept-Language.
    pub fn from_header(header_str: &str) -> Self {
        accept_language::parse(header_str)
            .iter()
            // "pt-BR" -> "pt", "en" -> "en"
            .map(|tag| tag.split('-').next().unwrap_or(tag).to_lowercase())
            .find(|lang| SUPPORTED_LANGUAGES.contains(&lang.as_str()))
            .map(Locale)
            .unwrap_or_default()
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale(SUPPORTED_LANGUAGES[0].to_string())
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
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .map(Locale::from_header)
            .unwrap_or_default();

        Ok(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_english_when_preferred() {
        assert_eq!(Locale::from_header("en-US,en;q=0.9,es;q=0.8"), Locale("en".into()));
    }

    #[test]
    fn falls_back_to_spanish() {
        assert_eq!(Locale::from_header("pt-BR"), Locale("es".into()));
        assert_eq!(Locale::from_header(""), Locale::default());
    }
}
