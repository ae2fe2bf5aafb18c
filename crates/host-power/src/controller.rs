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

//! Power controller - `power_on` / `power_off` entry points for the reconcile loop.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::backend::PowerBackend;
use crate::config::ConflictPolicy;
use crate::decision::{PowerAction, decide};
use crate::error::PowerError;
use crate::outcome::PowerOutcome;
use crate::publisher::{EventPublisher, NoopPublisher, reason};
use crate::types::{DesiredPowerState, HostId, HostPowerStatus, SetPowerResponse};

/// Runtime settings for [`PowerController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerControlSettings {
    /// Delay reported while a transition is in flight, deferred, or locked.
    pub requeue_delay: Duration,
    /// Upper bound for each backend round trip.
    pub request_timeout: Duration,
    pub conflict_policy: ConflictPolicy,
}

impl Default for PowerControlSettings {
    fn default() -> Self {
        Self {
            requeue_delay: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            conflict_policy: ConflictPolicy::default(),
        }
    }
}

/// Reconciles the power state of hosts against a [`PowerBackend`].
///
/// The controller keeps no per-host state between calls. Every call reads
/// the host status fresh and issues at most one power command. Callers must
/// not run two calls for the same host concurrently.
///
/// Trait bounds are on the impl blocks, not the struct, so the builder
/// methods work for any backend and publisher type.
pub struct PowerController<B, P = NoopPublisher> {
    backend: Arc<B>,
    publisher: P,
    settings: PowerControlSettings,
    cancel: CancellationToken,
}

impl<B> PowerController<B> {
    /// Create a new controller with default settings and no event publisher.
    pub fn new(backend: B) -> Self {
        Self::from_arc(Arc::new(backend))
    }

    /// Create a new controller sharing an existing backend.
    pub fn from_arc(backend: Arc<B>) -> Self {
        Self {
            backend,
            publisher: NoopPublisher,
            settings: PowerControlSettings::default(),
            cancel: CancellationToken::new(),
        }
    }
}

impl<B, P> PowerController<B, P> {
    /// Set the publisher receiving human-readable power events.
    pub fn with_publisher<P2>(self, publisher: P2) -> PowerController<B, P2> {
        PowerController {
            backend: self.backend,
            publisher,
            settings: self.settings,
            cancel: self.cancel,
        }
    }

    pub fn with_settings(mut self, settings: PowerControlSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Abort in-flight backend round trips when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn settings(&self) -> &PowerControlSettings {
        &self.settings
    }
}

impl<B: PowerBackend, P: EventPublisher> PowerController<B, P> {
    pub async fn power_on(&self, host_id: &HostId) -> PowerOutcome {
        self.ensure_power(host_id, DesiredPowerState::On).await
    }

    pub async fn power_off(&self, host_id: &HostId) -> PowerOutcome {
        self.ensure_power(host_id, DesiredPowerState::Off).await
    }

    /// Read the host status from the backend.
    pub async fn status(&self, host_id: &HostId) -> Result<HostPowerStatus, PowerError> {
        self.bounded("get_status", self.backend.get_status(host_id))
            .await
    }

    /// Drive the host toward `desired`, issuing a power command only when
    /// nothing else already owns the transition.
    pub async fn ensure_power(&self, host_id: &HostId, desired: DesiredPowerState) -> PowerOutcome {
        let status = match self.status(host_id).await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(%host_id, %desired, error = %e, "Failed to read host power status");
                return PowerOutcome::failed(e);
            }
        };

        let action = decide(desired, &status);
        tracing::trace!(%host_id, %desired, %action, ?status, "Power decision");
        match action {
            PowerAction::Converged => {
                tracing::debug!(%host_id, %desired, "Host is already in desired power state");
            }
            PowerAction::WaitInFlight => {
                tracing::info!(
                    %host_id,
                    %desired,
                    current = %status.current_power_state,
                    delay = ?self.settings.requeue_delay,
                    "Waiting for in-flight power transition"
                );
            }
            PowerAction::DeferProvisioning => {
                tracing::info!(
                    %host_id,
                    %desired,
                    provision_state = status.provisioning_activity().unwrap_or_default(),
                    delay = ?self.settings.requeue_delay,
                    "Host has provisioning activity, deferring power change"
                );
            }
            PowerAction::Issue => {}
        }

        match action.outcome(self.settings.requeue_delay) {
            Some(outcome) => outcome,
            None => self.issue_command(host_id, desired).await,
        }
    }

    async fn issue_command(&self, host_id: &HostId, desired: DesiredPowerState) -> PowerOutcome {
        // Always log to ensure we can see when power is being changed.
        tracing::info!(%host_id, target = %desired, "Changing host power state");

        let response = self
            .bounded("set_power", self.backend.set_power(host_id, desired))
            .await;

        match response {
            Ok(SetPowerResponse::Accepted) => {
                let event_reason = match desired {
                    DesiredPowerState::On => reason::POWER_ON,
                    DesiredPowerState::Off => reason::POWER_OFF,
                };
                self.publisher
                    .publish(event_reason, &format!("Host power {desired} requested"));
                PowerOutcome::continuing()
            }
            Ok(SetPowerResponse::Conflict) => {
                let delay = self.settings.requeue_delay;
                tracing::info!(%host_id, target = %desired, ?delay, "Host is locked, trying again after delay");
                self.publisher.publish(
                    reason::HOST_LOCKED,
                    &format!("Host is locked by another operation, retrying power {desired} in {delay:?}"),
                );

                let outcome = PowerOutcome::requeue(delay);
                if self.settings.conflict_policy.surfaces(desired) {
                    outcome.with_error(PowerError::lock_conflict(host_id))
                } else {
                    outcome
                }
            }
            Err(e) => {
                tracing::error!(%host_id, target = %desired, error = %e, "Failed to change host power state");
                self.publisher.publish(
                    reason::POWER_CHANGE_FAILED,
                    &format!("Failed to change power state to {desired}: {e}"),
                );
                PowerOutcome::failed(e)
            }
        }
    }

    /// Run a single backend round trip, bounded by the request timeout and
    /// the cancellation token. Either the future completes or it is dropped;
    /// no partial request state is kept.
    async fn bounded<T>(
        &self,
        operation: &'static str,
        request: impl Future<Output = Result<T, PowerError>>,
    ) -> Result<T, PowerError> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(PowerError::Cancelled { operation }),
            result = tokio::time::timeout(self.settings.request_timeout, request) => {
                result.unwrap_or(Err(PowerError::Timeout { operation }))
            }
        }
    }
}
