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

//! Power-off reconciliation scenarios.

use std::sync::Arc;
use std::time::Duration;

use super::helpers::*;
use crate::publisher::reason;
use crate::types::{DesiredPowerState, PowerState, SetPowerResponse};

#[tokio::test]
async fn test_already_off_is_converged() {
    let backend = FakeBackend::with_status(make_status(PowerState::Off, None, ""));
    let controller = make_controller(&backend);

    let outcome = controller.power_off(&host_id()).await;

    assert!(outcome.is_converged());
    assert_eq!(outcome.requeue_after, Duration::ZERO);
    assert_eq!(backend.calls(), vec![BackendCall::GetStatus(host_id())]);
}

#[tokio::test]
async fn test_waits_for_in_flight_power_off() {
    let backend = FakeBackend::with_status(make_status(
        PowerState::On,
        Some(PowerState::Off),
        "",
    ));
    let controller = make_controller(&backend);

    let outcome = controller.power_off(&host_id()).await;

    assert!(outcome.dirty);
    assert_eq!(outcome.requeue_after, REQUEUE_DELAY);
    assert!(outcome.error.is_none());
    assert!(backend.set_power_calls().is_empty());
}

#[tokio::test]
async fn test_issues_power_off_when_on() {
    let backend = FakeBackend::with_status(make_status(PowerState::On, None, ""));
    let events = Arc::new(Collector::default());
    let controller = make_controller(&backend).with_publisher(recording_publisher(events.clone()));

    let outcome = controller.power_off(&host_id()).await;

    assert!(outcome.dirty);
    assert_eq!(outcome.requeue_after, Duration::ZERO);
    assert!(outcome.error.is_none());
    assert_eq!(backend.set_power_calls(), vec![DesiredPowerState::Off]);
    assert_eq!(
        backend.current().target_power_state,
        Some(PowerState::Off)
    );
    assert_eq!(
        events.all(),
        vec![(
            reason::POWER_OFF.to_string(),
            "Host power off requested".to_string()
        )]
    );
}

#[tokio::test]
async fn test_defers_power_off_during_provisioning() {
    let backend = FakeBackend::with_status(make_status(PowerState::On, None, "deleted"));
    let controller = make_controller(&backend);

    let outcome = controller.power_off(&host_id()).await;

    assert!(outcome.dirty);
    assert_eq!(outcome.requeue_after, REQUEUE_DELAY);
    assert!(outcome.error.is_none());
    assert!(backend.set_power_calls().is_empty());
}

#[tokio::test]
async fn test_empty_provision_target_does_not_defer() {
    let backend = FakeBackend::with_status(make_status(PowerState::On, None, ""));
    let controller = make_controller(&backend);

    let outcome = controller.power_off(&host_id()).await;

    assert_eq!(outcome.requeue_after, Duration::ZERO);
    assert_eq!(backend.set_power_calls(), vec![DesiredPowerState::Off]);
}

#[tokio::test]
async fn test_conflict_on_power_off_requeues_without_error() {
    let backend = FakeBackend::with_status(make_status(PowerState::On, None, ""));
    backend.push_power_response(Ok(SetPowerResponse::Conflict));
    let events = Arc::new(Collector::default());
    let controller = make_controller(&backend).with_publisher(recording_publisher(events.clone()));

    let outcome = controller.power_off(&host_id()).await;

    assert!(outcome.dirty);
    assert_eq!(outcome.requeue_after, REQUEUE_DELAY);
    assert!(outcome.error.is_none());
    assert_eq!(backend.set_power_calls(), vec![DesiredPowerState::Off]);

    let published = events.all();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, reason::HOST_LOCKED);
    assert!(published[0].1.contains("power off"));
}

#[tokio::test]
async fn test_unknown_power_state_issues_power_off() {
    let backend = FakeBackend::with_status(make_status(PowerState::Unknown, None, ""));
    let controller = make_controller(&backend);

    let outcome = controller.power_off(&host_id()).await;

    assert!(outcome.dirty);
    assert!(!outcome.is_converged());
    assert_eq!(backend.set_power_calls(), vec![DesiredPowerState::Off]);
}
