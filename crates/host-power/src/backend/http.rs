/*
 * SPDX-FileCopyrightText: Copyright (c) 2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: Apache-2.0
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! HTTP implementation of the backend client, speaking the Ironic bare metal API.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use super::traits::PowerBackend;
use crate::config::{AuthConfig, BackendConfig};
use crate::error::PowerError;
use crate::types::{DesiredPowerState, HostId, HostPowerStatus, PowerState, SetPowerResponse};

const API_VERSION_HEADER: &str = "X-OpenStack-Ironic-API-Version";

const POWER_ON: &str = "power on";
const POWER_OFF: &str = "power off";

/// Subset of the node resource this crate reads.
#[derive(Debug, Deserialize)]
struct NodeStatus {
    #[serde(default)]
    power_state: Option<String>,
    #[serde(default)]
    target_power_state: Option<String>,
    #[serde(default)]
    target_provision_state: Option<String>,
}

#[derive(Debug, Serialize)]
struct PowerStateRequest {
    target: &'static str,
}

fn parse_power_state(state: &str) -> PowerState {
    match state {
        POWER_ON => PowerState::On,
        POWER_OFF => PowerState::Off,
        _ => PowerState::Unknown,
    }
}

fn power_target(state: DesiredPowerState) -> &'static str {
    match state {
        DesiredPowerState::On => POWER_ON,
        DesiredPowerState::Off => POWER_OFF,
    }
}

impl From<NodeStatus> for HostPowerStatus {
    fn from(node: NodeStatus) -> Self {
        Self {
            current_power_state: node
                .power_state
                .as_deref()
                .map(parse_power_state)
                .unwrap_or_default(),
            target_power_state: node
                .target_power_state
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(parse_power_state),
            target_provision_state: node.target_provision_state,
        }
    }
}

/// HTTP-backed implementation of [`PowerBackend`].
#[derive(Clone)]
pub struct HttpPowerBackend {
    client: reqwest::Client,
    base_url: Url,
    api_version: String,
    auth: AuthConfig,
}

impl HttpPowerBackend {
    /// Create a backend client with a default HTTP client.
    pub fn new(config: &BackendConfig) -> Result<Self, PowerError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a backend client with a provided HTTP client.
    pub fn with_client(client: reqwest::Client, config: &BackendConfig) -> Self {
        Self {
            client,
            base_url: config.url.clone(),
            api_version: config.api_version.clone(),
            auth: config.auth.clone(),
        }
    }

    fn node_url(&self, host_id: &HostId, suffix: &[&str]) -> Result<Url, PowerError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                PowerError::Config(format!("Backend URL cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(["v1", "nodes", host_id.as_str()])
            .extend(suffix);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(API_VERSION_HEADER, &self.api_version);
        match &self.auth {
            AuthConfig::NoAuth => builder,
            AuthConfig::HttpBasic { username, password } => {
                builder.basic_auth(username, Some(password))
            }
        }
    }
}

async fn unexpected_status(response: Response) -> PowerError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    PowerError::UnexpectedStatus { status, body }
}

#[async_trait]
impl PowerBackend for HttpPowerBackend {
    async fn get_status(&self, host_id: &HostId) -> Result<HostPowerStatus, PowerError> {
        let url = self.node_url(host_id, &[])?;
        let response = self.request(Method::GET, url).send().await?;

        match response.status() {
            status if status.is_success() => {
                let node: NodeStatus = response.json().await?;
                tracing::debug!(%host_id, ?node, "Fetched node status");
                Ok(node.into())
            }
            StatusCode::NOT_FOUND => Err(PowerError::host_not_found(host_id)),
            _ => Err(unexpected_status(response).await),
        }
    }

    async fn set_power(
        &self,
        host_id: &HostId,
        target: DesiredPowerState,
    ) -> Result<SetPowerResponse, PowerError> {
        let url = self.node_url(host_id, &["states", "power"])?;
        let response = self
            .request(Method::PUT, url)
            .json(&PowerStateRequest {
                target: power_target(target),
            })
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(SetPowerResponse::Accepted),
            StatusCode::CONFLICT => Ok(SetPowerResponse::Conflict),
            StatusCode::NOT_FOUND => Err(PowerError::host_not_found(host_id)),
            _ => Err(unexpected_status(response).await),
        }
    }
}
