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

//! Result of a single power control invocation, consumed by the reconcile loop.

use std::time::Duration;

use crate::error::PowerError;

/// Outcome of `power_on` / `power_off`.
///
/// `dirty` means the host has not converged to the desired power state yet.
/// `requeue_after` is the minimum delay before the caller should check the
/// host again; zero means the loop's normal cadence applies. An error may be
/// attached while `dirty` and `requeue_after` still carry meaning, which is
/// why this is not a plain `Result`.
#[derive(Debug, Default)]
pub struct PowerOutcome {
    pub dirty: bool,
    pub requeue_after: Duration,
    pub error: Option<PowerError>,
}

impl PowerOutcome {
    /// Host is already in the desired state.
    pub fn converged() -> Self {
        Self::default()
    }

    /// A change is in progress; check again on the next cycle.
    pub fn continuing() -> Self {
        Self {
            dirty: true,
            ..Default::default()
        }
    }

    /// A change is in flight or blocked; wait `delay` before checking again.
    pub fn requeue(delay: Duration) -> Self {
        Self {
            dirty: true,
            requeue_after: delay,
            error: None,
        }
    }

    /// The invocation failed; the caller's own retry cadence applies.
    pub fn failed(error: PowerError) -> Self {
        Self::continuing().with_error(error)
    }

    pub fn with_error(mut self, error: PowerError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn is_converged(&self) -> bool {
        !self.dirty && self.error.is_none()
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    /// Split off the attached error, if any, so callers can use `?`.
    pub fn into_result(mut self) -> Result<PowerOutcome, PowerError> {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}
