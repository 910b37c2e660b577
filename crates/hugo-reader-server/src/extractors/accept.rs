//! `Accept` header negotiation.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

const YAML_MEDIA_TYPES: &[&str] = &["application/x-yaml", "application/yaml", "text/yaml"];

/// Formatos de salida soportados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// Picks YAML when any listed media type is a YAML one, JSON otherwise
    /// (including `*/*` and unknown types). Quality values are ignored.
    pub fn from_accept(accept: Option<&str>) -> Self {
        let wants_yaml = accept.is_some_and(|accept| {
            accept
                .split(',')
                .filter_map(|part| part.split(';').next())
                .map(|media| media.trim().to_ascii_lowercase())
                .any(|media| YAML_MEDIA_TYPES.contains(&media.as_str()))
        });

        if wants_yaml { Self::Yaml } else { Self::Json }
    }

    /// Retorna el Content-Type correspondiente.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Yaml => "application/x-yaml",
        }
    }
}

/// Extractor que parsea el header Accept. Nunca rechaza.
pub struct AcceptFormat(pub OutputFormat);

impl<S> FromRequestParts<S> for AcceptFormat
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let accept = parts
            .headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok());

        Ok(AcceptFormat(OutputFormat::from_accept(accept)))
    }
}
