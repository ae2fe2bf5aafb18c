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

use std::fmt::Debug;
use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::controller::PowerControlSettings;
use crate::error::PowerError;
use crate::types::DesiredPowerState;

/// Environment variable prefix for configuration overrides,
/// e.g. `CARBIDE_POWER__BACKEND__URL`.
pub const ENV_PREFIX: &str = "CARBIDE_POWER__";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerControlConfig {
    /// Delay reported to the caller while a transition is in flight or blocked.
    #[serde(with = "humantime_serde")]
    pub requeue_delay: Duration,

    /// Upper bound for each backend round trip.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    pub conflict_policy: ConflictPolicy,

    pub backend: BackendConfig,
}

impl Default for PowerControlConfig {
    fn default() -> Self {
        Self {
            requeue_delay: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            conflict_policy: ConflictPolicy::default(),
            backend: BackendConfig::default(),
        }
    }
}

/// Whether a backend lock conflict is reported to the caller as an error.
///
/// Conflicts always produce a dirty outcome with the requeue delay. By
/// default they surface as an error on power-on but not on power-off, where
/// a lock during shutdown is treated as routine. Callers may rely on the
/// error channel differently per direction, so the asymmetry is kept until
/// the intended behavior is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConflictPolicy {
    pub surface_on_power_on: bool,
    pub surface_on_power_off: bool,
}

impl ConflictPolicy {
    /// Whether a conflict on a request toward `target` is reported as an error.
    pub fn surfaces(&self, target: DesiredPowerState) -> bool {
        match target {
            DesiredPowerState::On => self.surface_on_power_on,
            DesiredPowerState::Off => self.surface_on_power_off,
        }
    }
}

impl Default for ConflictPolicy {
    fn default() -> Self {
        Self {
            surface_on_power_on: true,
            surface_on_power_off: false,
        }
    }
}

/// Connection settings for the hardware management backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend API, without the version prefix.
    pub url: Url,

    /// Value sent in the `X-OpenStack-Ironic-API-Version` header.
    pub api_version: String,

    pub auth: AuthConfig,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: Url::parse("http://localhost:6385").expect("default backend URL is valid"),
            api_version: "1.81".to_string(),
            auth: AuthConfig::NoAuth,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    NoAuth,
    HttpBasic { username: String, password: String },
}

/// Debug structure omits credentials
impl Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAuth => f.write_str("NoAuth"),
            Self::HttpBasic { username, .. } => f
                .debug_struct("HttpBasic")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

impl PowerControlConfig {
    /// Load configuration from defaults, an optional TOML file and the
    /// environment, in increasing order of precedence.
    pub fn load(config_path: Option<&Path>) -> Result<Self, PowerError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Self = figment
            .extract()
            .map_err(|e| PowerError::Config(format!("Failed to load configuration: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PowerError> {
        if self.requeue_delay.is_zero() {
            return Err(PowerError::Config(
                "requeue_delay must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(PowerError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        match self.backend.url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(PowerError::Config(format!(
                    "Unsupported backend URL scheme: {scheme}"
                )));
            }
        }

        Ok(())
    }

    /// Runtime settings for [`crate::PowerController`].
    pub fn settings(&self) -> PowerControlSettings {
        PowerControlSettings {
            requeue_delay: self.requeue_delay,
            request_timeout: self.request_timeout,
            conflict_policy: self.conflict_policy,
        }
    }
}
