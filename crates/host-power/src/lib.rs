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

//! # Carbide Host Power
//!
//! Power-state reconciliation for bare-metal hosts managed through a remote
//! hardware management backend.
//!
//! ## Overview
//!
//! Given the desired power state of a host, [`PowerController`] reads the
//! host status from the backend and decides whether to:
//!
//! - report convergence,
//! - wait for a power transition already registered on the backend,
//! - defer because the host is in the middle of a provisioning action, or
//! - issue a power command, handling backend lock conflicts.
//!
//! The controller is stateless. The result of each call is a [`PowerOutcome`]
//! telling the surrounding reconcile loop whether the host is still changing
//! and how long to wait before checking again.
//!
//! ## Example
//!
//! ```rust,ignore
//! use carbide_host_power::{HostId, HttpPowerBackend, PowerControlConfig, PowerController};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PowerControlConfig::load(None)?;
//!     let backend = HttpPowerBackend::new(&config.backend)?;
//!     let controller = PowerController::new(backend)
//!         .with_settings(config.settings())
//!         .with_publisher(|reason: &str, message: &str| {
//!             println!("{reason}: {message}");
//!         });
//!
//!     let outcome = controller.power_on(&HostId::from("node-uuid")).await;
//!     if outcome.dirty {
//!         // check again after outcome.requeue_after
//!     }
//!     Ok(())
//! }
//! ```
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod backend;
pub mod config;
pub mod controller;
pub mod decision;
pub mod error;
pub mod outcome;
pub mod publisher;
pub mod types;

#[cfg(test)]
mod test;

// Re-exports for convenience
pub use backend::{HttpPowerBackend, PowerBackend};
pub use config::{AuthConfig, BackendConfig, ConflictPolicy, PowerControlConfig};
pub use controller::{PowerControlSettings, PowerController};
pub use decision::{PowerAction, decide};
pub use error::PowerError;
pub use outcome::PowerOutcome;
pub use publisher::{EventPublisher, NoopPublisher};
pub use types::{DesiredPowerState, HostId, HostPowerStatus, PowerState, SetPowerResponse};
