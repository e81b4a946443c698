//! Shared fixtures for engine integration tests

#![allow(dead_code)]

use gridstate_engine::EngineEvent;
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedReceiver;

/// `count` rows with ids from 1; every third row lives in Ankara.
pub fn people(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|id| {
            let city = if id % 3 == 0 { "Ankara" } else { "İzmir" };
            json!({
                "id": id,
                "name": format!("Person {id}"),
                "age": 20 + (id * 7) % 40,
                "address": { "city": city },
            })
        })
        .collect()
}

pub fn ids(rows: &[Value]) -> Vec<u64> {
    rows.iter().filter_map(|row| row["id"].as_u64()).collect()
}

/// Everything received so far, without waiting
pub fn drain(receiver: &mut UnboundedReceiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

pub fn state_changes(events: &[EngineEvent]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, EngineEvent::StateChanged(_)))
        .count()
}
