//! Two clients sharing one session stack, with the interface adapter enabled.
//!
//! Run with: `cargo run -p d7amux --example multi-client`

use std::sync::{Arc, Mutex};

use d7amux::alp::{InterfaceTable, RecordingSink};
use d7amux::engine::{Addressee, NlsMethod, SessionConfig, SimOutcome, SimulatedEngine};
use d7amux::session::{FnCallbacks, SendMode, Stack, StackError};
use d7amux::store::MemoryStore;

fn main() -> Result<(), StackError> {
    let sink = RecordingSink::new();
    let mut stack = Stack::new(SimulatedEngine::new(), MemoryStore::default())
        .with_interface_adapter(InterfaceTable::new(), sink.clone());
    stack.init()?;

    let log = Arc::new(Mutex::new(Vec::new()));
    let sensor_log = log.clone();
    let sensor = stack.register(
        FnCallbacks::new()
            .with_response(move |handle, payload, result| {
                if let Ok(mut log) = sensor_log.lock() {
                    log.push(format!(
                        "sensor: response to {handle}: {payload:?} (link budget {})",
                        result.link_budget
                    ));
                }
            })
            .with_transmitted(|handle, outcome| {
                println!("sensor: transaction {handle} finished: {outcome:?}");
            }),
    );
    let actuator = stack.register(FnCallbacks::new().with_transmitted(|handle, outcome| {
        println!("actuator: transaction {handle} finished: {outcome:?}");
    }));

    println!("device address: {}", stack.get_device_address()?);
    println!(
        "budget: {} bytes plain, {} bytes with aes-ccm-128",
        stack.get_max_payload_size(NlsMethod::None),
        stack.get_max_payload_size(NlsMethod::AesCcm128)
    );

    let secured = SessionConfig {
        addressee: Addressee::broadcast(0x01).with_nls_method(NlsMethod::AesCcm128),
        ..SessionConfig::default()
    };
    stack
        .engine_mut()
        .push_outcome(SimOutcome::Responded(b"21.5C".to_vec().into()));
    stack.send(sensor, Some(&secured), b"read temp", 5, SendMode::Sync)?;

    let handle = stack.send(actuator, None, b"open valve", 0, SendMode::Async)?;
    println!("actuator: queued {handle:?}, dispatched {} events", stack.process_events());

    if let Some(mut adapter) = stack.interface_adapter() {
        adapter.send_command(b"alp", 0, None, SendMode::Sync)?;
    }

    for line in log.lock().map(|log| log.clone()).unwrap_or_default() {
        println!("{line}");
    }
    println!("interface sink saw {} events", sink.events().len());

    stack.stop();
    Ok(())
}
