use d7amux_engine::{EngineError, SessionResult, TransactionHandle};

/// Callbacks a client leaves on file when it registers.
///
/// The router invokes exactly one of them per engine event, serially.
pub trait ClientCallbacks: Send {
    /// A response arrived for a transaction this client started.
    fn on_response(&mut self, handle: TransactionHandle, payload: &[u8], result: &SessionResult);

    /// A send of this client finished. Fires once per accepted send.
    fn on_transmitted(&mut self, handle: TransactionHandle, outcome: Result<(), EngineError>);

    /// Data arrived that no transaction of this client asked for.
    /// Returns whether the payload was handled.
    fn on_unsolicited(&mut self, payload: &[u8], result: &SessionResult) -> bool;
}

type ResponseFn = Box<dyn FnMut(TransactionHandle, &[u8], &SessionResult) + Send>;
type TransmittedFn = Box<dyn FnMut(TransactionHandle, Result<(), EngineError>) + Send>;
type UnsolicitedFn = Box<dyn FnMut(&[u8], &SessionResult) -> bool + Send>;

/// Client callbacks built from closures. Unset callbacks do nothing and
/// unsolicited data is declined.
pub struct FnCallbacks {
    response: ResponseFn,
    transmitted: TransmittedFn,
    unsolicited: UnsolicitedFn,
}

impl FnCallbacks {
    pub fn new() -> Self {
        Self {
            response: Box::new(|_, _, _| {}),
            transmitted: Box::new(|_, _| {}),
            unsolicited: Box::new(|_, _| false),
        }
    }

    pub fn with_response(
        mut self,
        f: impl FnMut(TransactionHandle, &[u8], &SessionResult) + Send + 'static,
    ) -> Self {
        self.response = Box::new(f);
        self
    }

    pub fn with_transmitted(
        mut self,
        f: impl FnMut(TransactionHandle, Result<(), EngineError>) + Send + 'static,
    ) -> Self {
        self.transmitted = Box::new(f);
        self
    }

    pub fn with_unsolicited(
        mut self,
        f: impl FnMut(&[u8], &SessionResult) -> bool + Send + 'static,
    ) -> Self {
        self.unsolicited = Box::new(f);
        self
    }
}

impl Default for FnCallbacks {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientCallbacks for FnCallbacks {
    fn on_response(&mut self, handle: TransactionHandle, payload: &[u8], result: &SessionResult) {
        (self.response)(handle, payload, result)
    }

    fn on_transmitted(&mut self, handle: TransactionHandle, outcome: Result<(), EngineError>) {
        (self.transmitted)(handle, outcome)
    }

    fn on_unsolicited(&mut self, payload: &[u8], result: &SessionResult) -> bool {
        (self.unsolicited)(payload, result)
    }
}
