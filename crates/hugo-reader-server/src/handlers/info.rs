//! Server information endpoint.

use axum::{
    extract::{Query, rejection::QueryRejection},
    response::Response,
};
use serde::Serialize;
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::{accept::AcceptFormat, query::InfoQuery};
use crate::handlers::response::Envelope;
use crate::response::to_format;

const NAME: &str = "Hugo Reader";
const DESCRIPTION: &str = "Read-only query server for Hugo static sites";

#[derive(Debug, Clone, Serialize)]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    /// Set at build time through `HUGO_READER_GIT_COMMIT`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_commit: Option<&'static str>,
    /// Set at build time through `HUGO_READER_BUILD_TIME`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_time: Option<&'static str>,
    pub description: &'static str,
    pub repository: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<RuntimeInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolInfo>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RuntimeInfo {
    pub os: &'static str,
    pub arch: &'static str,
    pub cpus: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: &'static str,
    pub endpoint: &'static str,
    pub description: &'static str,
}

const TOOLS: &[ToolInfo] = &[
    ToolInfo {
        name: "taxonomies",
        endpoint: "GET /taxonomies",
        description: "List the taxonomies defined by a site",
    },
    ToolInfo {
        name: "terms",
        endpoint: "GET /terms",
        description: "List the terms of one taxonomy",
    },
    ToolInfo {
        name: "content",
        endpoint: "POST /content",
        description: "Retrieve metadata and body of content by path",
    },
    ToolInfo {
        name: "search",
        endpoint: "GET /search",
        description: "Search content with optional type and taxonomy filters",
    },
    ToolInfo {
        name: "discover",
        endpoint: "GET /discover",
        description: "Describe site structure: overview, sections, pages or sitemap",
    },
    ToolInfo {
        name: "cache",
        endpoint: "GET|DELETE /cache, POST /cache/clean",
        description: "Inspect, clear or clean the response cache",
    },
    ToolInfo {
        name: "info",
        endpoint: "GET /info",
        description: "Version, build and runtime information",
    },
];

impl InfoResponse {
    pub fn build(query: &InfoQuery) -> Self {
        Self {
            name: NAME,
            version: env!("CARGO_PKG_VERSION"),
            git_commit: option_env!("HUGO_READER_GIT_COMMIT"),
            build_time: option_env!("HUGO_READER_BUILD_TIME"),
            description: DESCRIPTION,
            repository: env!("CARGO_PKG_REPOSITORY"),
            runtime: query.include_runtime.then(|| RuntimeInfo {
                os: std::env::consts::OS,
                arch: std::env::consts::ARCH,
                cpus: std::thread::available_parallelism().map_or(1, |n| n.get()),
            }),
            tools: query.include_tools.then(|| TOOLS.to_vec()),
        }
    }
}

/// GET /info
#[instrument(skip_all)]
pub async fn get_info(
    query: Result<Query<InfoQuery>, QueryRejection>,
    AcceptFormat(format): AcceptFormat,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    Ok(to_format(&Envelope::ok(InfoResponse::build(&query)), format)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_sections_follow_flags() {
        let bare = InfoResponse::build(&InfoQuery::default());
        assert!(bare.runtime.is_none());
        assert!(bare.tools.is_none());

        let full = InfoResponse::build(&InfoQuery {
            include_runtime: true,
            include_tools: true,
        });
        assert!(full.runtime.as_ref().is_some_and(|r| r.cpus >= 1));
        assert_eq!(full.tools.map(|t| t.len()), Some(TOOLS.len()));
    }

    #[test]
    fn version_comes_from_the_package() {
        assert_eq!(InfoResponse::build(&InfoQuery::default()).version, env!("CARGO_PKG_VERSION"));
    }
}
