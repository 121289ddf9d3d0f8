//! Job-board search links for a role.

use axum::extract::Query;
use axum::Json;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

const LINKEDIN_SEARCH: &str = "https://www.linkedin.com/jobs/search/";
const INDEED_SEARCH: &str = "https://www.indeed.com/jobs";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortalLink {
    pub name: &'static str,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub role: String,
}

fn link(name: &'static str, base: &str, param: &str, role: &str) -> Result<PortalLink, AppError> {
    let url = Url::parse_with_params(base, &[(param, role)])
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(PortalLink {
        name,
        url: url.into(),
    })
}

pub fn search_links(role: &str) -> Result<Vec<PortalLink>, AppError> {
    let role = role.trim();
    if role.is_empty() {
        return Err(AppError::Validation("role cannot be empty".to_string()));
    }
    Ok(vec![
        link("LinkedIn", LINKEDIN_SEARCH, "keywords", role)?,
        link("Indeed", INDEED_SEARCH, "q", role)?,
    ])
}

/// GET /api/v1/search-links?role=
pub async fn handle_search_links(
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<PortalLink>>, AppError> {
    Ok(Json(search_links(&query.role)?))
}
