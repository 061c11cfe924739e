// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use herd_core::EventKind;

fn rectify() -> Event {
    Event::RectifyJobs { error: None }
}

fn sync(n: usize) -> Event {
    Event::ClusterSync { error: Some(format!("pass {n}")) }
}

#[tokio::test]
async fn subscribers_observe_the_same_order() {
    let bus = EventBus::new(16);
    let mut a = bus.subscribe();
    let mut b = bus.subscribe();

    bus.publish(rectify());
    bus.publish(sync(1));

    for stream in [&mut a, &mut b] {
        assert_eq!(stream.recv().await.map(|e| e.kind()), Some(EventKind::RectifyJobs));
        assert_eq!(stream.recv().await.map(|e| e.kind()), Some(EventKind::ClusterSync));
    }
}

#[tokio::test]
async fn publish_without_subscribers_is_fine() {
    let bus = EventBus::new(4);
    bus.publish(rectify());
    assert_eq!(bus.subscriber_count(), 0);
}

#[tokio::test]
async fn laggards_skip_oldest_and_count_losses() {
    let bus = EventBus::new(2);
    let mut slow = bus.subscribe();

    for n in 0..5 {
        bus.publish(sync(n));
    }

    // Capacity 2: passes 0–2 were overwritten while the subscriber slept.
    let event = slow.recv().await.unwrap();
    assert_eq!(event, sync(3));
    assert_eq!(slow.missed(), 3);

    assert_eq!(slow.try_recv(), Some(sync(4)));
    assert_eq!(slow.try_recv(), None);
}

#[tokio::test]
async fn stream_ends_when_bus_drops() {
    let bus = EventBus::new(4);
    let mut stream = bus.subscribe();
    bus.publish(rectify());
    drop(bus);

    // Buffered events still drain, then the stream closes.
    assert_eq!(stream.recv().await.map(|e| e.kind()), Some(EventKind::RectifyJobs));
    assert_eq!(stream.recv().await, None);
}
