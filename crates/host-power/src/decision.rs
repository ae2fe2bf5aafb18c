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

//! Power decision engine.
//!
//! Maps the desired power state and the host status reported by the backend
//! to a single action. The rules are evaluated in a fixed order and the first
//! match wins:
//!
//! 1. current power state equals desired -> [`PowerAction::Converged`]
//! 2. backend target power state equals desired -> [`PowerAction::WaitInFlight`]
//! 3. a provisioning action is in progress -> [`PowerAction::DeferProvisioning`]
//! 4. otherwise -> [`PowerAction::Issue`]
//!
//! Rule 2 is checked before rule 3: a transition toward the desired state that
//! is already registered is waited on regardless of provisioning activity.

use std::fmt;
use std::time::Duration;

use crate::outcome::PowerOutcome;
use crate::types::{DesiredPowerState, HostPowerStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Converged,
    WaitInFlight,
    DeferProvisioning,
    Issue,
}

impl PowerAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Converged => "converged",
            Self::WaitInFlight => "wait_in_flight",
            Self::DeferProvisioning => "defer_provisioning",
            Self::Issue => "issue",
        }
    }

    /// Outcome for actions that don't need a backend command. `None` for
    /// [`PowerAction::Issue`], whose outcome depends on the command result.
    pub fn outcome(&self, requeue_delay: Duration) -> Option<PowerOutcome> {
        match self {
            Self::Converged => Some(PowerOutcome::converged()),
            Self::WaitInFlight | Self::DeferProvisioning => {
                Some(PowerOutcome::requeue(requeue_delay))
            }
            Self::Issue => None,
        }
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn decide(desired: DesiredPowerState, status: &HostPowerStatus) -> PowerAction {
    if status.is_converged(desired) {
        PowerAction::Converged
    } else if status.target_matches(desired) {
        PowerAction::WaitInFlight
    } else if status.provisioning_activity().is_some() {
        PowerAction::DeferProvisioning
    } else {
        PowerAction::Issue
    }
}
