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

//! Backend client trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::PowerError;
use crate::types::{DesiredPowerState, HostId, HostPowerStatus, SetPowerResponse};

/// Remote hardware management service controlling host power.
///
/// Implementations do their own transport-level retries, if any. A resource
/// lock reported by the backend must come back as
/// [`SetPowerResponse::Conflict`], not as an error.
#[async_trait]
pub trait PowerBackend: Send + Sync {
    /// Read the current power and provisioning status of a host.
    async fn get_status(&self, host_id: &HostId) -> Result<HostPowerStatus, PowerError>;

    /// Request a power change. Returns once the backend has accepted or
    /// rejected the request; the transition itself completes asynchronously.
    async fn set_power(
        &self,
        host_id: &HostId,
        target: DesiredPowerState,
    ) -> Result<SetPowerResponse, PowerError>;
}

#[async_trait]
impl<T: PowerBackend + ?Sized> PowerBackend for Arc<T> {
    async fn get_status(&self, host_id: &HostId) -> Result<HostPowerStatus, PowerError> {
        (**self).get_status(host_id).await
    }

    async fn set_power(
        &self,
        host_id: &HostId,
        target: DesiredPowerState,
    ) -> Result<SetPowerResponse, PowerError> {
        (**self).set_power(host_id, target).await
    }
}
