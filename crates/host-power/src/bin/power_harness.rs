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

//! Carbide host power harness.
//!
//! Drives the power controller against a real hardware management backend,
//! without a full Carbide deployment. Used to validate power flows.

use std::path::PathBuf;
use std::time::Duration;

use carbide_host_power::{
    DesiredPowerState, EventPublisher, HostId, HttpPowerBackend, PowerControlConfig,
    PowerController, PowerOutcome,
};
use clap::{Parser, Subcommand};

/// Pause between converge attempts when the outcome asks for no extra delay.
const IDLE_DELAY: Duration = Duration::from_secs(2);

#[derive(Parser)]
#[command(name = "carbide-power-harness")]
#[command(about = "Exercise host power control against a hardware management backend", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the power and provisioning status of a host
    Status {
        #[arg(long)]
        host: String,
    },

    /// Run a single power-on reconcile step
    On {
        #[arg(long)]
        host: String,
    },

    /// Run a single power-off reconcile step
    Off {
        #[arg(long)]
        host: String,
    },

    /// Reconcile repeatedly until the host reaches the desired state
    Converge {
        #[arg(long)]
        host: String,

        /// Desired power state: on or off
        #[arg(long)]
        desired: DesiredPowerState,

        /// Give up after this many reconcile steps
        #[arg(long, default_value = "30")]
        max_attempts: u32,
    },
}

fn report(host_id: &HostId, outcome: &PowerOutcome) {
    match &outcome.error {
        Some(e) => tracing::warn!(
            %host_id,
            dirty = outcome.dirty,
            requeue_after = ?outcome.requeue_after,
            error = %e,
            "Reconcile step returned an error"
        ),
        None => tracing::info!(
            %host_id,
            dirty = outcome.dirty,
            requeue_after = ?outcome.requeue_after,
            "Reconcile step finished"
        ),
    }
}

async fn converge(
    controller: &PowerController<HttpPowerBackend, impl EventPublisher>,
    host_id: &HostId,
    desired: DesiredPowerState,
    max_attempts: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    for attempt in 1..=max_attempts {
        let outcome = controller.ensure_power(host_id, desired).await;
        report(host_id, &outcome);

        let outcome = outcome.into_result()?;
        if !outcome.dirty {
            tracing::info!(%host_id, %desired, attempt, "Host converged");
            return Ok(());
        }

        let delay = if outcome.requeue_after.is_zero() {
            IDLE_DELAY
        } else {
            outcome.requeue_after
        };
        tracing::debug!(%host_id, attempt, ?delay, "Waiting before next attempt");
        tokio::time::sleep(delay).await;
    }

    Err(format!("Host {host_id} did not reach power {desired} after {max_attempts} attempts").into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("carbide_host_power=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = PowerControlConfig::load(cli.config.as_deref())?;
    tracing::info!(url = %config.backend.url, auth = ?config.backend.auth, "Loaded configuration");

    let backend = HttpPowerBackend::new(&config.backend)?;
    let controller = PowerController::new(backend)
        .with_settings(config.settings())
        .with_publisher(|reason: &str, message: &str| {
            tracing::info!(reason, message, "Power event");
        });

    match cli.command {
        Commands::Status { host } => {
            let host_id = HostId::new(host);
            let status = controller.status(&host_id).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Commands::On { host } => {
            let host_id = HostId::new(host);
            let outcome = controller.power_on(&host_id).await;
            report(&host_id, &outcome);
            outcome.into_result()?;
        }
        Commands::Off { host } => {
            let host_id = HostId::new(host);
            let outcome = controller.power_off(&host_id).await;
            report(&host_id, &outcome);
            outcome.into_result()?;
        }
        Commands::Converge {
            host,
            desired,
            max_attempts,
        } => {
            converge(&controller, &HostId::new(host), desired, max_attempts).await?;
        }
    }

    Ok(())
}
