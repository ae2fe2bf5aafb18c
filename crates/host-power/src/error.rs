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

//! Error types for host power control.

use thiserror::Error;

use crate::types::HostId;

/// Error type for power control operations.
#[derive(Error, Debug)]
pub enum PowerError {
    /// The backend holds a lock on the host for a competing operation.
    /// Recoverable by waiting and trying again.
    #[error("Host {host_id} is locked by another operation")]
    LockConflict { host_id: HostId },

    #[error("Backend transport error: {0}")]
    Transport(String),

    #[error("Backend returned unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Host not found: {host_id}")]
    HostNotFound { host_id: HostId },

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),

    #[error("Timeout waiting for {operation}")]
    Timeout { operation: &'static str },

    #[error("Cancelled while waiting for {operation}")]
    Cancelled { operation: &'static str },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PowerError {
    pub fn lock_conflict(host_id: &HostId) -> Self {
        Self::LockConflict {
            host_id: host_id.clone(),
        }
    }

    pub fn host_not_found(host_id: &HostId) -> Self {
        Self::HostNotFound {
            host_id: host_id.clone(),
        }
    }

    /// True for backend-reported contention, as opposed to terminal failures.
    pub fn is_lock_conflict(&self) -> bool {
        matches!(self, Self::LockConflict { .. })
    }
}

impl From<reqwest::Error> for PowerError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}
