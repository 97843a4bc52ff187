// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Composition root: builds a device, attaches the event logger and an
//! async bus consumer, then plays a short input script.
//!
//! Run with:
//!
//! ```bash
//! RUST_LOG=microbit_sim=debug cargo run --example composition
//! ```

use microbit_sim::event::EventBus;
use microbit_sim::observer::EventLogger;
use microbit_sim::{ButtonId, CombinedEmission, Device, DeviceConfig, LedGrid};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> microbit_sim::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "microbit_sim=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).unwrap_or_else(|e| {
                tracing::warn!(path = %path, error = %e, "Cannot read config, using defaults");
                "{}".to_string()
            });
            DeviceConfig::from_json(&text)?
        }
        None => DeviceConfig::default().with_combined_emission(CombinedEmission::EveryEdge),
    };

    let device = Device::from_config(config);
    let logger = EventLogger::attach(&device);
    tracing::info!(device = %device.id(), "Event logger initialized");

    let bus = EventBus::new();
    let mut rx = bus.subscribe();
    let consumer = tokio::spawn(async move {
        let mut count = 0usize;
        while let Ok(record) = rx.recv().await {
            tracing::debug!(at = %record.timestamp, "bus: {}", record.event);
            count += 1;
        }
        count
    });
    let attachment = bus.attach(&device);

    device.publish_display("10101:01010:00100:01010:10101");

    device.report_button_edge(ButtonId::A, true);
    device.report_button_edge(ButtonId::B, true);
    device.report_button_edge(ButtonId::A, false);
    device.report_button_edge(ButtonId::B, false);
    device.report_button_edge_named("B", true)?;
    device.report_button_edge_named("B", false)?;

    let heart: LedGrid = "01010:11111:11111:01110:00100".parse()?;
    device.show(&heart);

    device.unsubscribe_all(&attachment);
    logger.detach(&device);
    drop(bus);

    let forwarded = consumer.await.unwrap_or_default();
    tracing::info!(forwarded, "Done");
    Ok(())
}
