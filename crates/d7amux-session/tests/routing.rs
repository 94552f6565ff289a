use std::sync::{Arc, Mutex};

use bytes::Bytes;
use d7amux_alp::{InterfaceDirectory, InterfaceTable, RecordingSink, SinkEvent, ITF_ID_D7ASP};
use d7amux_engine::{
    Addressee, ClientId, EngineError, NlsMethod, SessionConfig, SessionResult, SimOutcome,
    SimulatedEngine, TransactionHandle,
};
use d7amux_session::{
    ClientCallbacks, DeviceAddress, FnCallbacks, SendMode, Stack, StackError,
};
use d7amux_store::{DeviceRecord, MemoryStore};

/// Every callback invocation of one client, in order.
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Response(TransactionHandle, Vec<u8>),
    Transmitted(TransactionHandle, Result<(), EngineError>),
    Unsolicited(Vec<u8>),
}

#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
    accept_unsolicited: bool,
}

impl Recorder {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl ClientCallbacks for Recorder {
    fn on_response(&mut self, handle: TransactionHandle, payload: &[u8], _result: &SessionResult) {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Response(handle, payload.to_vec()));
    }

    fn on_transmitted(&mut self, handle: TransactionHandle, outcome: Result<(), EngineError>) {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Transmitted(handle, outcome));
    }

    fn on_unsolicited(&mut self, payload: &[u8], _result: &SessionResult) -> bool {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Unsolicited(payload.to_vec()));
        self.accept_unsolicited
    }
}

fn started() -> Stack<SimulatedEngine, MemoryStore> {
    let mut stack = Stack::new(SimulatedEngine::new(), MemoryStore::default());
    stack.init().unwrap();
    stack
}

fn ccm128() -> SessionConfig {
    SessionConfig {
        addressee: Addressee::broadcast(1).with_nls_method(NlsMethod::AesCcm128),
        ..SessionConfig::default()
    }
}

#[test]
fn sync_send_with_ccm128_completes() {
    let mut stack = started();
    let client = Recorder::default();
    let id = stack.register(client.clone());

    let result = stack
        .send(id, Some(&ccm128()), &[0x42; 10], 0, SendMode::Sync)
        .unwrap();

    assert_eq!(result, None);
    assert_eq!(
        client.calls(),
        vec![Call::Transmitted(TransactionHandle(0), Ok(()))]
    );
    assert_eq!(stack.engine().sent()[0].payload.len(), 10);
}

#[test]
fn response_reaches_only_the_owning_client() {
    let mut stack = started();
    let first = Recorder::default();
    let second = Recorder::default();
    stack.register(first.clone());
    let owner = stack.register(second.clone());
    assert_eq!(owner, ClientId(1));

    let handled = stack
        .on_response(
            Some(TransactionHandle(7)),
            owner,
            b"reply",
            &SessionResult::default(),
        )
        .unwrap();

    assert!(handled);
    assert!(first.calls().is_empty());
    assert_eq!(
        second.calls(),
        vec![Call::Response(TransactionHandle(7), b"reply".to_vec())]
    );
}

#[test]
fn every_async_send_completes_exactly_once() {
    let mut stack = started();
    let client = Recorder::default();
    let id = stack.register(client.clone());

    let engine = stack.engine_mut();
    engine.push_outcome(SimOutcome::Delivered);
    engine.push_outcome(SimOutcome::Failed(EngineError::NoAck));
    engine.push_outcome(SimOutcome::Responded(Bytes::from_static(b"ok")));
    engine.push_outcome(SimOutcome::Failed(EngineError::AddressingFailed));

    let mut handles = Vec::new();
    for _ in 0..4 {
        handles.push(
            stack
                .send(id, None, b"req", 2, SendMode::Async)
                .unwrap()
                .unwrap(),
        );
    }
    assert_eq!(stack.process_events(), 5);

    let transmitted: Vec<_> = client
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::Transmitted(handle, outcome) => Some((handle, outcome)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transmitted,
        vec![
            (handles[0], Ok(())),
            (handles[1], Err(EngineError::NoAck)),
            (handles[2], Ok(())),
            (handles[3], Err(EngineError::AddressingFailed)),
        ]
    );
}

#[test]
fn unregistered_client_send_has_no_side_effects() {
    let mut stack = started();
    let client = Recorder::default();
    stack.register(client.clone());

    let err = stack
        .send(ClientId(1), None, b"x", 0, SendMode::Async)
        .unwrap_err();

    assert!(matches!(err, StackError::InvalidClient(ClientId(1))));
    assert!(stack.engine().sent().is_empty());
    assert_eq!(stack.engine().pending_events(), 0);
    assert!(client.calls().is_empty());
}

#[test]
fn sync_send_dispatches_other_clients_events_in_order() {
    let mut stack = started();
    let bystander = Recorder {
        accept_unsolicited: true,
        ..Recorder::default()
    };
    let sender = Recorder::default();
    let other = stack.register(bystander.clone());
    let id = stack.register(sender.clone());

    stack.engine_mut().inject_unsolicited(other, b"cmd".to_vec());
    stack
        .engine_mut()
        .push_outcome(SimOutcome::Responded(Bytes::from_static(b"pong")));

    stack.send(id, None, b"ping", 4, SendMode::Sync).unwrap();

    assert_eq!(bystander.calls(), vec![Call::Unsolicited(b"cmd".to_vec())]);
    assert_eq!(
        sender.calls(),
        vec![
            Call::Response(TransactionHandle(0), b"pong".to_vec()),
            Call::Transmitted(TransactionHandle(0), Ok(())),
        ]
    );
    assert_eq!(stack.engine().pending_events(), 0);
}

#[test]
fn sync_send_leaves_later_events_queued() {
    let mut stack = started();
    let client = Recorder::default();
    let id = stack.register(client.clone());

    stack.send(id, None, b"a", 0, SendMode::Sync).unwrap();
    stack
        .engine_mut()
        .inject_unsolicited(id, Bytes::from_static(b"late"));

    assert_eq!(stack.engine().pending_events(), 1);
    assert_eq!(stack.process_events(), 1);
    assert_eq!(
        client.calls(),
        vec![
            Call::Transmitted(TransactionHandle(0), Ok(())),
            Call::Unsolicited(b"late".to_vec()),
        ]
    );
}

#[test]
fn closure_callbacks_receive_results() {
    let mut stack = started();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let id = stack.register(
        FnCallbacks::new().with_response(move |handle, payload, _| {
            sink.lock().unwrap().push((handle, payload.to_vec()));
        }),
    );
    stack
        .engine_mut()
        .push_outcome(SimOutcome::Responded(Bytes::from_static(b"42")));

    stack.send(id, None, b"q", 2, SendMode::Sync).unwrap();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(TransactionHandle(0), b"42".to_vec())]
    );
}

#[test]
fn stop_invalidates_clients_until_reregistered() {
    let mut stack = started();
    let id = stack.register(Recorder::default());
    stack.stop();

    assert!(matches!(
        stack.send(id, None, b"x", 0, SendMode::Async),
        Err(StackError::NotInitialized)
    ));

    stack.init().unwrap();
    assert!(matches!(
        stack.send(id, None, b"x", 0, SendMode::Async),
        Err(StackError::InvalidClient(_))
    ));
    let id = stack.register(Recorder::default());
    assert_eq!(id, ClientId(0));
    assert!(stack.send(id, None, b"x", 0, SendMode::Async).is_ok());
}

#[test]
fn adapter_bridges_traffic_to_sink() {
    let sink = RecordingSink::new();
    let mut stack = Stack::new(SimulatedEngine::new(), MemoryStore::default())
        .with_interface_adapter(InterfaceTable::new(), sink.clone());
    stack.init().unwrap();

    let app = stack.register(Recorder::default());
    assert_eq!(app, ClientId(1));
    assert!(stack
        .directory()
        .and_then(|d| d.lookup(ITF_ID_D7ASP))
        .is_some_and(|d| d.unique));

    let result = SessionResult {
        addressee: Addressee::uid([9; 8], 1),
        link_budget: 80,
        ..SessionResult::default()
    };
    stack
        .on_response(Some(TransactionHandle(3)), ClientId(0), b"rsp", &result)
        .unwrap();
    stack
        .on_transmitted(TransactionHandle(3), ClientId(0), Err(EngineError::Busy))
        .unwrap();

    let events = sink.events();
    assert_eq!(events.len(), 2);
    match &events[0] {
        SinkEvent::Response {
            handle,
            payload,
            status,
        } => {
            assert_eq!(*handle, TransactionHandle(3));
            assert_eq!(payload.as_ref(), b"rsp");
            assert_eq!(status.itf_id, ITF_ID_D7ASP);
            assert_eq!(status.len, 23);
            assert_eq!(status.result.link_budget, 80);
        }
        other => panic!("unexpected sink event: {other:?}"),
    }
    assert_eq!(
        events[1],
        SinkEvent::Completed {
            handle: TransactionHandle(3),
            outcome: Err(EngineError::Busy)
        }
    );
}

#[test]
fn device_address_falls_back_to_uid() {
    let mut stack = Stack::new(
        SimulatedEngine::new(),
        MemoryStore::new(DeviceRecord {
            uid: [1, 2, 3, 4, 5, 6, 7, 8],
            vid: [0xFF, 0xFF],
            active_access_class: 1,
        }),
    );
    stack.init().unwrap();

    let address = stack.get_device_address().unwrap();
    assert_eq!(address, DeviceAddress::Uid([1, 2, 3, 4, 5, 6, 7, 8]));
    assert_eq!(address.to_string(), "0102030405060708");
}
