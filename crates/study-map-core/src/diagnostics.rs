// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::config::{AppConfig, DataSource};
use crate::tiles::{TileSource, UrlTemplateTileSource};
use log::{info, warn};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub enum ProbeStatus {
    /// Server answered; carries the HTTP status code.
    Reachable(u16),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub url: String,
    pub status: ProbeStatus,
    pub elapsed: Duration,
}

impl ProbeResult {
    pub fn is_ok(&self) -> bool {
        matches!(self.status, ProbeStatus::Reachable(code) if (200..400).contains(&code))
    }
}

/// One GET against `url` within `timeout`. Never fails; problems end up in
/// the returned status.
pub fn probe(url: &str, timeout: Duration, user_agent: &str) -> ProbeResult {
    let started = Instant::now();
    let status = match reqwest::blocking::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(user_agent)
        .build()
        .and_then(|client| client.get(url).send())
    {
        Ok(response) => ProbeStatus::Reachable(response.status().as_u16()),
        Err(e) => ProbeStatus::Failed(e.to_string()),
    };

    let result = ProbeResult {
        url: url.to_string(),
        status,
        elapsed: started.elapsed(),
    };
    match &result.status {
        ProbeStatus::Reachable(code) => info!("Probe {} -> {}", url, code),
        ProbeStatus::Failed(e) => warn!("Probe {} failed: {}", url, e),
    }
    result
}

/// URLs worth checking for the given configuration: the top-level tile and,
/// for remote data, the locations endpoint.
pub fn probe_targets(config: &AppConfig) -> Vec<String> {
    let tiles = UrlTemplateTileSource::new(config.tile_url_template.clone());
    let mut targets = vec![tiles.tile_url(1, 0, 0)];
    if let DataSource::Remote { base_url } = &config.data_source {
        targets.push(format!("{}/locations", base_url.trim_end_matches('/')));
    }
    targets
}

pub fn run_diagnostics(config: &AppConfig) -> Vec<ProbeResult> {
    probe_targets(config)
        .iter()
        .map(|url| probe(url, config.request_timeout(), &config.user_agent))
        .collect()
}
