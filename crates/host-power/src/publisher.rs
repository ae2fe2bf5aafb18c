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

//! Human-readable event reporting for power changes.

/// Event reasons published by the power controller.
pub mod reason {
    pub const POWER_ON: &str = "PowerOn";
    pub const POWER_OFF: &str = "PowerOff";
    pub const HOST_LOCKED: &str = "HostLocked";
    pub const POWER_CHANGE_FAILED: &str = "PowerChangeFailed";
}

/// Receives status messages about power changes on a host.
///
/// Purely observational: the controller never depends on what a publisher
/// does with an event. Closures of the form `Fn(&str, &str)` implement this
/// trait automatically.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, reason: &str, message: &str);
}

/// Default publisher that drops every event.
pub struct NoopPublisher;

impl EventPublisher for NoopPublisher {
    fn publish(&self, _reason: &str, _message: &str) {}
}

impl<F> EventPublisher for F
where
    F: Fn(&str, &str) + Send + Sync,
{
    fn publish(&self, reason: &str, message: &str) {
        self(reason, message)
    }
}
