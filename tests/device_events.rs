// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the device event model.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use microbit_sim::subscription::Subscribable;
use microbit_sim::{
    ButtonId, CombinedEmission, Device, DeviceEvent, DisplayPattern, EventChannel,
    LatestValueChannel,
};
use parking_lot::Mutex;

/// Records every value delivered to a subscription.
fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + Sync + 'static)
{
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    (seen, move |value: &T| seen_clone.lock().push(value.clone()))
}

/// Every sequence of `len` edges over both buttons.
fn edge_sequences(len: u32) -> impl Iterator<Item = Vec<(ButtonId, bool)>> {
    (0..4u32.pow(len)).map(move |mut code| {
        (0..len)
            .map(|_| {
                let id = if code & 1 == 0 { ButtonId::A } else { ButtonId::B };
                let pressed = code & 2 != 0;
                code >>= 2;
                (id, pressed)
            })
            .collect()
    })
}

// ============================================================================
// Scenarios
// ============================================================================

mod scenarios {
    use super::*;

    #[test]
    fn press_a_reports_a_true_and_ab_false() {
        let device = Device::new();
        let (a, a_cb) = recorder();
        let (ab, ab_cb) = recorder();
        device.on_button_a().subscribe(a_cb);
        device.on_button_ab().subscribe(ab_cb);
        a.lock().clear();
        ab.lock().clear();

        device.report_button_edge(ButtonId::A, true);

        assert_eq!(*a.lock(), vec![true]);
        assert_eq!(*ab.lock(), vec![false]);
    }

    #[test]
    fn press_b_with_a_held_reports_ab_true() {
        let device = Device::new();
        device.report_button_edge(ButtonId::A, true);

        let (b, b_cb) = recorder();
        let (ab, ab_cb) = recorder();
        device.on_button_b().subscribe(b_cb);
        device.on_button_ab().subscribe(ab_cb);
        b.lock().clear();
        ab.lock().clear();

        device.report_button_edge(ButtonId::B, true);

        assert_eq!(*b.lock(), vec![true]);
        assert_eq!(*ab.lock(), vec![true]);
    }

    #[test]
    fn release_a_with_b_held_reports_ab_false() {
        let device = Device::new();
        device.report_button_edge(ButtonId::A, true);
        device.report_button_edge(ButtonId::B, true);

        let (ab, ab_cb) = recorder();
        device.on_button_ab().subscribe(ab_cb);
        ab.lock().clear();

        device.report_button_edge(ButtonId::A, false);

        assert_eq!(*ab.lock(), vec![false]);
    }

    #[test]
    fn display_pattern_delivered_once_unchanged() {
        let device = Device::new();
        let (seen, cb) = recorder::<DisplayPattern>();
        device.on_display_change().subscribe(cb);

        device.publish_display("10101:01010:00100:01010:10101");

        assert_eq!(
            *seen.lock(),
            vec![DisplayPattern::new("10101:01010:00100:01010:10101")]
        );
    }

    #[test]
    fn late_subscriber_receives_only_latest() {
        let channel = LatestValueChannel::new(false);
        channel.emit(true);
        channel.emit(false);
        channel.emit(true);

        let (seen, cb) = recorder();
        channel.subscribe(cb);

        assert_eq!(*seen.lock(), vec![true]);
    }

    #[test]
    fn late_device_subscriber_receives_only_latest() {
        let device = Device::new();
        device.report_button_edge(ButtonId::A, true);
        device.report_button_edge(ButtonId::A, false);
        device.report_button_edge(ButtonId::A, true);

        let (seen, cb) = recorder();
        device.on_button_a().subscribe(cb);

        assert_eq!(*seen.lock(), vec![true]);
    }
}

// ============================================================================
// Properties
// ============================================================================

mod properties {
    use super::*;

    #[test]
    fn combined_always_matches_and_of_buttons() {
        for sequence in edge_sequences(5) {
            let device = Device::new();
            let (ab, ab_cb) = recorder();
            device.on_button_ab().subscribe(ab_cb);

            let (mut a, mut b) = (false, false);
            for (id, pressed) in sequence {
                match id {
                    ButtonId::A => a = pressed,
                    ButtonId::B => b = pressed,
                }
                device.report_button_edge(id, pressed);

                assert_eq!(ab.lock().last(), Some(&(a && b)));
                assert_eq!(device.on_button_ab().current(), a && b);
            }
        }
    }

    #[test]
    fn every_edge_policy_emits_once_per_edge() {
        for sequence in edge_sequences(4) {
            let device = Device::new();
            let counter = Arc::new(AtomicU32::new(0));
            let counter_clone = counter.clone();
            device.on_button_ab().subscribe(move |_| {
                counter_clone.fetch_add(1, Ordering::SeqCst);
            });

            for (id, pressed) in &sequence {
                device.report_button_edge(*id, *pressed);
            }

            // One replay plus one per edge
            assert_eq!(counter.load(Ordering::SeqCst) as usize, sequence.len() + 1);
        }
    }

    #[test]
    fn on_change_policy_never_repeats_a_value() {
        for sequence in edge_sequences(5) {
            let device = Device::builder()
                .with_combined_emission(CombinedEmission::OnChange)
                .build();
            let (ab, ab_cb) = recorder::<bool>();
            device.on_button_ab().subscribe(ab_cb);

            for (id, pressed) in sequence {
                device.report_button_edge(id, pressed);
            }

            let values = ab.lock();
            assert!(values.windows(2).all(|pair| pair[0] != pair[1]));
            assert_eq!(values.last(), Some(&device.buttons().ab));
        }
    }

    #[test]
    fn subscribe_replays_exactly_once_before_later_values() {
        let device = Device::new();
        device.report_button_edge(ButtonId::B, true);

        let (seen, cb) = recorder();
        device.on_button_b().subscribe(cb);
        assert_eq!(*seen.lock(), vec![true]);

        device.report_button_edge(ButtonId::B, false);
        assert_eq!(*seen.lock(), vec![true, false]);
    }

    #[test]
    fn unsubscribed_callback_is_never_called_again() {
        let device = Device::new();
        let counter = Arc::new(AtomicU32::new(0));
        let keep_counter = Arc::new(AtomicU32::new(0));

        let counter_clone = counter.clone();
        let id = device.on_button_a().subscribe(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });
        let keep_clone = keep_counter.clone();
        device.on_button_a().subscribe(move |_| {
            keep_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(device.on_button_a().unsubscribe(id));
        for pressed in [true, false, true] {
            device.report_button_edge(ButtonId::A, pressed);
        }

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(keep_counter.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn display_reaches_every_subscriber_in_order() {
        let device = Device::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in 0..3 {
            let order = order.clone();
            device
                .on_display_change()
                .subscribe(move |p: &DisplayPattern| order.lock().push((tag, p.to_string())));
        }

        device.publish_display("x");

        assert_eq!(
            *order.lock(),
            vec![
                (0, "x".to_string()),
                (1, "x".to_string()),
                (2, "x".to_string())
            ]
        );
    }

    #[test]
    fn handle_from_another_channel_is_ignored() {
        let display = EventChannel::<DisplayPattern>::new();
        let device = Device::new();
        let foreign = display.subscribe(|_| {});

        assert!(!device.on_button_a().unsubscribe(foreign));
        assert_eq!(device.on_button_a().subscriber_count(), 0);
    }
}

// ============================================================================
// Re-entrancy and failure isolation
// ============================================================================

mod reentrancy {
    use super::*;

    #[test]
    fn panicking_subscriber_does_not_block_others() {
        let device = Device::new();
        device.on_display_change().subscribe(|_| panic!("subscriber failure"));
        let (seen, cb) = recorder::<DisplayPattern>();
        device.on_display_change().subscribe(cb);

        device.publish_display("11111:11111:11111:11111:11111");

        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn callback_may_publish_display() {
        let device = Arc::new(Device::new());
        let (seen, cb) = recorder::<DisplayPattern>();
        device.on_display_change().subscribe(cb);

        let device_clone = Arc::clone(&device);
        device.on_button_ab().subscribe(move |both: &bool| {
            if *both {
                device_clone.publish_display("00000:01010:00000:10001:01110");
            }
        });

        device.report_button_edge(ButtonId::A, true);
        device.report_button_edge(ButtonId::B, true);

        assert_eq!(
            *seen.lock(),
            vec![DisplayPattern::new("00000:01010:00000:10001:01110")]
        );
    }

    #[test]
    fn unsubscribe_inside_combined_callback() {
        let device = Arc::new(Device::new());
        let counter = Arc::new(AtomicU32::new(0));
        let handle = Arc::new(Mutex::new(None));

        let device_clone = Arc::clone(&device);
        let counter_clone = counter.clone();
        let handle_clone = handle.clone();
        let id = device.on_button_ab().subscribe(move |both: &bool| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
            if *both {
                if let Some(id) = *handle_clone.lock() {
                    device_clone.on_button_ab().unsubscribe(id);
                }
            }
        });
        *handle.lock() = Some(id);

        device.report_button_edge(ButtonId::A, true);
        device.report_button_edge(ButtonId::B, true);
        device.report_button_edge(ButtonId::B, false);

        // Replay, A edge, B edge (unsubscribes), nothing after
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn edge_from_combined_callback_leaves_no_stale_value() {
        let device = Arc::new(Device::new());
        let device_clone = Arc::clone(&device);
        device.on_button_ab().subscribe(move |both: &bool| {
            if *both {
                device_clone.report_button_edge(ButtonId::A, false);
            }
        });
        let (seen, cb) = recorder::<bool>();
        device.on_button_ab().subscribe(cb);

        device.report_button_edge(ButtonId::A, true);
        device.report_button_edge(ButtonId::B, true);

        assert!(!device.on_button_ab().current());
        assert_eq!(*seen.lock(), vec![false, false, false]);
    }

    #[test]
    fn edge_from_button_callback_leaves_no_stale_value() {
        let device = Arc::new(Device::new());
        let device_clone = Arc::clone(&device);
        device.on_button_a().subscribe(move |pressed: &bool| {
            if *pressed {
                device_clone.report_button_edge(ButtonId::A, false);
            }
        });
        let (seen, cb) = recorder::<bool>();
        device.on_button_a().subscribe(cb);

        device.report_button_edge(ButtonId::A, true);

        assert!(!device.is_pressed(ButtonId::A));
        assert_eq!(seen.lock().last(), Some(&false));
        assert_eq!(*seen.lock(), vec![false, false]);
    }

    #[test]
    fn any_event_sees_consistent_combined_state() {
        let device = Arc::new(Device::new());
        let device_clone = Arc::clone(&device);
        let mismatches = Arc::new(AtomicU32::new(0));
        let mismatches_clone = mismatches.clone();

        device.on_any_event(move |event: &DeviceEvent| {
            if event.is_button() {
                let snapshot = device_clone.buttons();
                if snapshot.ab != (snapshot.a && snapshot.b) {
                    mismatches_clone.fetch_add(1, Ordering::SeqCst);
                }
            }
        });

        for (id, pressed) in edge_sequences(6).flatten() {
            device.report_button_edge(id, pressed);
        }

        assert_eq!(mismatches.load(Ordering::SeqCst), 0);
    }
}
