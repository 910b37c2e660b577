use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::extractors::accept::OutputFormat;

pub fn to_response<T: Serialize>(
    data: &T,
    status: StatusCode,
) -> Result<Response, super::SerializeError> {
    let body = serde_yaml::to_string(data)?;

    Ok((
        status,
        [(header::CONTENT_TYPE, OutputFormat::Yaml.content_type())],
        body,
    )
        .into_response())
}
