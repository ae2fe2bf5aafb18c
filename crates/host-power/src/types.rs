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

//! Host power types shared by the decision engine, controller and backends.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque identifier used to address a host on the backend (e.g. node UUID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostId(String);

impl HostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HostId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for HostId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Power state requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesiredPowerState {
    On,
    Off,
}

impl fmt::Display for DesiredPowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
        }
    }
}

impl FromStr for DesiredPowerState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            other => Err(format!("invalid power state '{other}', expected 'on' or 'off'")),
        }
    }
}

/// Power state as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    On,
    Off,
    /// The backend could not determine the power state, or reported one we
    /// don't model (e.g. a reboot in progress).
    #[default]
    Unknown,
}

impl From<DesiredPowerState> for PowerState {
    fn from(state: DesiredPowerState) -> Self {
        match state {
            DesiredPowerState::On => Self::On,
            DesiredPowerState::Off => Self::Off,
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Power and provisioning status of a host, read fresh from the backend on
/// every invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPowerStatus {
    pub current_power_state: PowerState,
    /// A transition already commanded on the backend, by us or another actor.
    pub target_power_state: Option<PowerState>,
    /// Target of an in-progress provisioning action (e.g. "deleted").
    pub target_provision_state: Option<String>,
}

impl HostPowerStatus {
    /// The in-progress provisioning action, if any. Empty strings count as none.
    pub fn provisioning_activity(&self) -> Option<&str> {
        self.target_provision_state
            .as_deref()
            .filter(|target| !target.is_empty())
    }

    pub fn is_converged(&self, desired: DesiredPowerState) -> bool {
        self.current_power_state == PowerState::from(desired)
    }

    pub fn target_matches(&self, desired: DesiredPowerState) -> bool {
        self.target_power_state == Some(PowerState::from(desired))
    }
}

/// Non-error responses to a power change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetPowerResponse {
    /// The request was acknowledged and the transition is now pending.
    Accepted,
    /// The host is locked by a competing operation.
    Conflict,
}
