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

//! Shared test infrastructure for power controller tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::PowerBackend;
use crate::controller::{PowerControlSettings, PowerController};
use crate::error::PowerError;
use crate::publisher::EventPublisher;
use crate::types::{DesiredPowerState, HostId, HostPowerStatus, PowerState, SetPowerResponse};

pub(crate) const NODE_UUID: &str = "33ce8659-7400-4c68-9535-d10766f07a58";

pub(crate) const REQUEUE_DELAY: Duration = Duration::from_secs(10);

pub(crate) fn host_id() -> HostId {
    HostId::from(NODE_UUID)
}

/// Records items pushed from synchronous callbacks.
pub(crate) struct Collector<T> {
    pub items: Mutex<Vec<T>>,
}

impl<T> Default for Collector<T> {
    fn default() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }
}

impl<T: Clone> Collector<T> {
    pub fn push(&self, item: T) {
        self.items.lock().unwrap().push(item);
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn all(&self) -> Vec<T> {
        self.items.lock().unwrap().clone()
    }
}

/// A published `(reason, message)` pair.
pub(crate) type Event = (String, String);

/// Publisher that records every event into a shared collector.
pub(crate) fn recording_publisher(events: Arc<Collector<Event>>) -> impl EventPublisher {
    move |reason: &str, message: &str| events.push((reason.to_string(), message.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BackendCall {
    GetStatus(HostId),
    SetPower(HostId, DesiredPowerState),
}

/// Scripted in-memory backend.
///
/// `get_status` pops from the status script and falls back to the current
/// status once the script is exhausted; `set_power` does the same with the
/// power script, defaulting to `Accepted`. An accepted request registers the
/// target power state, like a real backend would.
#[derive(Clone, Default)]
pub(crate) struct FakeBackend {
    current: Arc<Mutex<HostPowerStatus>>,
    status_script: Arc<Mutex<VecDeque<Result<HostPowerStatus, PowerError>>>>,
    power_script: Arc<Mutex<VecDeque<Result<SetPowerResponse, PowerError>>>>,
    calls: Arc<Mutex<Vec<BackendCall>>>,
    hang_status: Arc<AtomicBool>,
    hang_power: Arc<AtomicBool>,
}

impl FakeBackend {
    pub fn with_status(status: HostPowerStatus) -> Self {
        let backend = Self::default();
        *backend.current.lock().unwrap() = status;
        backend
    }

    pub fn push_status(&self, status: Result<HostPowerStatus, PowerError>) -> &Self {
        self.status_script.lock().unwrap().push_back(status);
        self
    }

    pub fn push_power_response(&self, response: Result<SetPowerResponse, PowerError>) -> &Self {
        self.power_script.lock().unwrap().push_back(response);
        self
    }

    /// Make `get_status` never return.
    pub fn hang_status(&self) {
        self.hang_status.store(true, Ordering::SeqCst);
    }

    /// Make `set_power` never return.
    pub fn hang_power(&self) {
        self.hang_power.store(true, Ordering::SeqCst);
    }

    pub fn current(&self) -> HostPowerStatus {
        self.current.lock().unwrap().clone()
    }

    /// Simulate the backend finishing the pending transition.
    pub fn complete_transition(&self) {
        let mut current = self.current.lock().unwrap();
        if let Some(target) = current.target_power_state.take() {
            current.current_power_state = target;
        }
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_power_calls(&self) -> Vec<DesiredPowerState> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BackendCall::SetPower(_, target) => Some(target),
                BackendCall::GetStatus(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl PowerBackend for FakeBackend {
    async fn get_status(&self, host_id: &HostId) -> Result<HostPowerStatus, PowerError> {
        self.calls
            .lock()
            .unwrap()
            .push(BackendCall::GetStatus(host_id.clone()));
        if self.hang_status.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let scripted = self.status_script.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(self.current()))
    }

    async fn set_power(
        &self,
        host_id: &HostId,
        target: DesiredPowerState,
    ) -> Result<SetPowerResponse, PowerError> {
        self.calls
            .lock()
            .unwrap()
            .push(BackendCall::SetPower(host_id.clone(), target));
        if self.hang_power.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let response = self
            .power_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(SetPowerResponse::Accepted));
        if matches!(response, Ok(SetPowerResponse::Accepted)) {
            self.current.lock().unwrap().target_power_state = Some(target.into());
        }
        response
    }
}

pub(crate) fn make_status(
    current: PowerState,
    target: Option<PowerState>,
    target_provision_state: &str,
) -> HostPowerStatus {
    HostPowerStatus {
        current_power_state: current,
        target_power_state: target,
        target_provision_state: Some(target_provision_state.to_string()),
    }
}

pub(crate) fn test_settings() -> PowerControlSettings {
    PowerControlSettings {
        requeue_delay: REQUEUE_DELAY,
        request_timeout: Duration::from_secs(30),
        ..Default::default()
    }
}

pub(crate) fn make_controller(backend: &FakeBackend) -> PowerController<FakeBackend> {
    PowerController::new(backend.clone()).with_settings(test_settings())
}
