//! Bridge that publishes the session stack as one interface of a generic
//! application-layer command directory.

use std::sync::MutexGuard;

use d7amux_alp::{AlpSink, InterfaceDescriptor, InterfaceStatus, ITF_ID_D7ASP};
use d7amux_engine::{
    decode_session_config, ClientId, EngineError, SessionEngine, SessionResult, TransactionHandle,
    SESSION_CONFIG_LEN, SESSION_RESULT_MAX_LEN,
};
use d7amux_store::DeviceStore;
use tracing::debug;

use crate::callbacks::ClientCallbacks;
use crate::error::{Result, StackError};
use crate::router::SendMode;
use crate::stack::{SharedSink, Stack};

/// Directory entry of the session interface.
pub fn interface_descriptor() -> InterfaceDescriptor {
    InterfaceDescriptor {
        itf_id: ITF_ID_D7ASP,
        cfg_len: SESSION_CONFIG_LEN,
        status_len: SESSION_RESULT_MAX_LEN,
        unique: true,
    }
}

/// Client callbacks of the adapter: every event is forwarded to the sink
/// together with an interface status.
pub(crate) struct AdapterCallbacks {
    sink: SharedSink,
}

impl AdapterCallbacks {
    pub(crate) fn new(sink: SharedSink) -> Self {
        Self { sink }
    }

    fn sink(&self) -> MutexGuard<'_, dyn AlpSink + 'static> {
        // A sink that panicked mid-call still receives later events.
        self.sink
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ClientCallbacks for AdapterCallbacks {
    fn on_response(&mut self, handle: TransactionHandle, payload: &[u8], result: &SessionResult) {
        let status = InterfaceStatus::for_session(*result);
        debug!(
            handle = handle.0,
            len = payload.len(),
            status_len = status.len,
            "forwarding response to sink"
        );
        self.sink().received_response(handle, payload, &status);
    }

    fn on_transmitted(
        &mut self,
        handle: TransactionHandle,
        outcome: std::result::Result<(), EngineError>,
    ) {
        self.sink().command_completed(handle, outcome);
    }

    fn on_unsolicited(&mut self, payload: &[u8], result: &SessionResult) -> bool {
        let status = InterfaceStatus::for_session(*result);
        debug!(
            len = payload.len(),
            link_budget = result.link_budget,
            "forwarding command to sink"
        );
        self.sink().process_command(payload, ITF_ID_D7ASP, &status)
    }
}

/// Interface-side view of a stack with the adapter configured.
///
/// Obtained from [`Stack::interface_adapter`].
pub struct InterfaceAdapter<'a, E, S, const N: usize> {
    stack: &'a mut Stack<E, S, N>,
}

impl<E: SessionEngine, S: DeviceStore, const N: usize> InterfaceAdapter<'_, E, S, N> {
    /// Send an application-layer command over the session layer.
    ///
    /// `itf_cfg` is an encoded session configuration; `None` uses the active
    /// one.
    pub fn send_command(
        &mut self,
        payload: &[u8],
        expected_response_len: u8,
        itf_cfg: Option<&[u8]>,
        mode: SendMode,
    ) -> Result<Option<TransactionHandle>> {
        let client_id = self.client_id().ok_or(StackError::NotInitialized)?;
        let config = itf_cfg.map(decode_session_config).transpose()?;
        self.stack
            .send(client_id, config.as_ref(), payload, expected_response_len, mode)
    }

    /// Start the underlying stack.
    pub fn init(&mut self) -> Result<()> {
        self.stack.init()
    }

    /// Stop the underlying stack.
    pub fn deinit(&mut self) {
        self.stack.stop()
    }

    /// Client id the adapter holds while the stack is running.
    pub fn client_id(&self) -> Option<ClientId> {
        self.stack.adapter.as_ref().and_then(|slot| slot.client_id)
    }

    pub fn descriptor(&self) -> InterfaceDescriptor {
        interface_descriptor()
    }
}

impl<E: SessionEngine, S: DeviceStore, const N: usize> Stack<E, S, N> {
    /// The interface adapter, when one was configured.
    pub fn interface_adapter(&mut self) -> Option<InterfaceAdapter<'_, E, S, N>> {
        if self.adapter.is_none() {
            return None;
        }
        Some(InterfaceAdapter { stack: self })
    }
}

#[cfg(test)]
mod tests {
    use bytes::BytesMut;
    use d7amux_alp::{InterfaceDirectory, InterfaceTable, RecordingSink, SinkEvent};
    use d7amux_engine::{
        encode_session_config, Addressee, CodecError, SessionConfig, SimulatedEngine,
    };
    use d7amux_store::MemoryStore;

    use super::*;

    fn with_adapter(sink: RecordingSink) -> Stack<SimulatedEngine, MemoryStore> {
        Stack::new(SimulatedEngine::new(), MemoryStore::default())
            .with_interface_adapter(InterfaceTable::new(), sink)
    }

    #[test]
    fn descriptor_matches_codec_sizes() {
        let descriptor = interface_descriptor();
        assert_eq!(descriptor.itf_id, 0xD7);
        assert_eq!(descriptor.cfg_len, 12);
        assert_eq!(descriptor.status_len, 23);
        assert!(descriptor.unique);
    }

    #[test]
    fn absent_without_configuration() {
        let mut stack = Stack::new(SimulatedEngine::new(), MemoryStore::default());
        assert!(stack.interface_adapter().is_none());
        assert!(stack.directory().is_none());
    }

    #[test]
    fn init_registers_adapter_first() {
        let mut stack = with_adapter(RecordingSink::new());
        let mut adapter = stack.interface_adapter().unwrap();
        assert_eq!(adapter.client_id(), None);

        adapter.init().unwrap();
        assert_eq!(adapter.client_id(), Some(ClientId(0)));
        assert_eq!(
            stack.directory().and_then(|d| d.lookup(ITF_ID_D7ASP)).copied(),
            Some(interface_descriptor())
        );
        assert_eq!(stack.client_count(), 1);
    }

    #[test]
    fn send_command_before_init_fails() {
        let mut stack = with_adapter(RecordingSink::new());
        let err = stack
            .interface_adapter()
            .unwrap()
            .send_command(b"x", 0, None, SendMode::Async)
            .unwrap_err();
        assert!(matches!(err, StackError::NotInitialized));
    }

    #[test]
    fn send_command_decodes_interface_config() {
        let sink = RecordingSink::new();
        let mut stack = with_adapter(sink.clone());
        stack.init().unwrap();

        let config = SessionConfig {
            addressee: Addressee::uid([1, 2, 3, 4, 5, 6, 7, 8], 0x21),
            ..SessionConfig::default()
        };
        let mut blob = BytesMut::new();
        encode_session_config(&config, &mut blob);

        let result = stack
            .interface_adapter()
            .unwrap()
            .send_command(b"alp", 8, Some(&blob[..]), SendMode::Sync)
            .unwrap();
        assert_eq!(result, None);

        let sent = &stack.engine().sent()[0];
        assert_eq!(sent.client_id, ClientId(0));
        assert_eq!(sent.config, config);
        assert_eq!(sent.expected_response_len, 8);
        assert_eq!(
            sink.events(),
            vec![SinkEvent::Completed {
                handle: TransactionHandle(0),
                outcome: Ok(())
            }]
        );
    }

    #[test]
    fn truncated_interface_config_is_rejected() {
        let mut stack = with_adapter(RecordingSink::new());
        stack.init().unwrap();

        let err = stack
            .interface_adapter()
            .unwrap()
            .send_command(b"alp", 0, Some(&[0u8; 4][..]), SendMode::Async)
            .unwrap_err();
        assert!(matches!(
            err,
            StackError::Codec(CodecError::Truncated { .. })
        ));
        assert!(stack.engine().sent().is_empty());
    }

    #[test]
    fn deinit_releases_client_and_reinit_keeps_directory() {
        let mut stack = with_adapter(RecordingSink::new());
        let mut adapter = stack.interface_adapter().unwrap();
        adapter.init().unwrap();
        adapter.deinit();
        assert_eq!(adapter.client_id(), None);

        adapter.init().unwrap();
        assert_eq!(adapter.client_id(), Some(ClientId(0)));
    }

    #[test]
    fn unsolicited_command_reaches_sink_with_status() {
        let sink = RecordingSink::new().accept_commands(false);
        let mut stack = with_adapter(sink.clone());
        stack.init().unwrap();

        let result = SessionResult {
            addressee: Addressee::vid([0xAB, 0xCD], 1),
            ..SessionResult::default()
        };
        let handled = stack
            .on_response(None, ClientId(0), b"cmd", &result)
            .unwrap();
        assert!(!handled);

        match sink.events().as_slice() {
            [SinkEvent::Command { itf_id, status, .. }] => {
                assert_eq!(*itf_id, ITF_ID_D7ASP);
                assert_eq!(status.len, 17);

                let mut stored = BytesMut::new();
                status.encode(&mut stored);
                assert_eq!(InterfaceStatus::decode(&stored), Ok(*status));
            }
            other => panic!("unexpected sink events: {other:?}"),
        }
    }

    #[test]
    fn directory_rejects_conflicting_unique_interface() {
        let mut table = InterfaceTable::new();
        table
            .register_interface(InterfaceDescriptor {
                cfg_len: 4,
                ..interface_descriptor()
            })
            .unwrap();

        let mut stack = Stack::new(SimulatedEngine::new(), MemoryStore::default())
            .with_interface_adapter(table, RecordingSink::new());
        assert!(matches!(
            stack.init(),
            Err(StackError::Directory(_))
        ));
        assert!(!stack.is_initialized());
    }
}
