use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::domain::OrganismCode;
use crate::error::KeggError;

pub trait KeggClient: Send + Sync {
    /// Lists every pathway known for the organism, as raw `path:`-prefixed
    /// references in service order.
    fn list_pathways(&self, organism: &OrganismCode) -> Result<Vec<String>, KeggError>;
    /// Raw `rn:`-prefixed reaction references linked to the pathway.
    fn get_reactions_by_pathway(&self, pathway: &str) -> Result<Vec<String>, KeggError>;
    /// Raw `cpd:`-prefixed compound references linked to the pathway.
    fn get_compounds_by_pathway(&self, pathway: &str) -> Result<Vec<String>, KeggError>;
}

#[derive(Clone)]
pub struct KeggHttpClient {
    client: Client,
    base_url: String,
}

impl KeggHttpClient {
    pub fn new() -> Result<Self, KeggError> {
        Self::with_base_url("https://rest.kegg.jp".to_string())
    }

    pub fn with_base_url(base_url: String) -> Result<Self, KeggError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("keggpull/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| KeggError::KeggHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| KeggError::KeggHttp(err.to_string()))?;
        Ok(Self { client, base_url })
    }

    fn get_text(&self, url: &str) -> Result<String, KeggError> {
        tracing::debug!(%url, "kegg request");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| KeggError::KeggHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "KEGG request failed".to_string());
            return Err(KeggError::KeggStatus { status, message });
        }
        response
            .text()
            .map_err(|err| KeggError::KeggHttp(err.to_string()))
    }
}

impl KeggClient for KeggHttpClient {
    fn list_pathways(&self, organism: &OrganismCode) -> Result<Vec<String>, KeggError> {
        let url = format!("{}/list/pathway/{}", self.base_url, organism.as_str());
        let body = self.get_text(&url)?;
        Ok(parse_pathway_list(&body))
    }

    fn get_reactions_by_pathway(&self, pathway: &str) -> Result<Vec<String>, KeggError> {
        let url = format!("{}/link/rn/{}", self.base_url, pathway_entry(pathway));
        let body = self.get_text(&url)?;
        Ok(parse_link_targets(&body, "rn:"))
    }

    fn get_compounds_by_pathway(&self, pathway: &str) -> Result<Vec<String>, KeggError> {
        let url = format!("{}/link/cpd/{}", self.base_url, pathway_entry(pathway));
        let body = self.get_text(&url)?;
        Ok(parse_link_targets(&body, "cpd:"))
    }
}

/// The REST link endpoints take the bare entry, without the `path:` prefix.
fn pathway_entry(pathway: &str) -> &str {
    pathway.strip_prefix("path:").unwrap_or(pathway)
}

/// First tab-separated column of each line. The 2022 REST revision dropped the
/// `path:` prefix from list output; older responses carry it. Both shapes are
/// normalized to the prefixed raw form.
fn parse_pathway_list(body: &str) -> Vec<String> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| line.split('\t').next())
        .map(|entry| ensure_prefix(entry.trim(), "path:"))
        .collect()
}

/// Second tab-separated column of each `source<TAB>target` link line,
/// normalized to the given database prefix. Lines without a target column are
/// dropped; canonical shape is enforced downstream by pattern extraction.
fn parse_link_targets(body: &str, prefix: &str) -> Vec<String> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| line.split('\t').nth(1))
        .map(|entry| ensure_prefix(entry.trim(), prefix))
        .collect()
}

fn ensure_prefix(entry: &str, prefix: &str) -> String {
    if entry.starts_with(prefix) {
        entry.to_string()
    } else {
        format!("{prefix}{entry}")
    }
}
