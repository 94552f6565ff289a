use std::sync::{Arc, Mutex};

use d7amux_engine::{EngineError, SessionResult, SimOutcome, SimulatedEngine, TransactionHandle};
use d7amux_session::{ClientCallbacks, SendMode, Stack};
use d7amux_store::{DeviceStore, JsonFileStore, MemoryStore};
use serde::Serialize;

use crate::cmd::SendArgs;
use crate::exit::{stack_error, CliResult, FAILURE, SUCCESS};
use crate::output::{hex, payload_preview, print_records, OutputFormat, Render};

#[derive(Debug, Clone, Serialize)]
struct EventRow {
    event: &'static str,
    client_id: u8,
    handle: Option<u16>,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    link_budget: Option<u8>,
}

impl Render for EventRow {
    fn headers() -> Vec<&'static str> {
        vec!["EVENT", "CLIENT", "HANDLE", "DETAIL"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.event.to_string(),
            self.client_id.to_string(),
            self.handle.map(|h| h.to_string()).unwrap_or_else(|| "-".to_string()),
            self.detail.clone(),
        ]
    }

    fn pretty(&self) -> String {
        let handle = self
            .handle
            .map(|h| h.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} client={} handle={} {}",
            self.event, self.client_id, handle, self.detail
        )
    }
}

/// Client that records every callback as a printable row.
struct EventLog {
    client_id: u8,
    rows: Arc<Mutex<Vec<EventRow>>>,
}

impl EventLog {
    fn push(&self, row: EventRow) {
        if let Ok(mut rows) = self.rows.lock() {
            rows.push(row);
        }
    }
}

impl ClientCallbacks for EventLog {
    fn on_response(&mut self, handle: TransactionHandle, payload: &[u8], result: &SessionResult) {
        self.push(EventRow {
            event: "response",
            client_id: self.client_id,
            handle: Some(handle.0),
            detail: payload_preview(payload),
            link_budget: Some(result.link_budget),
        });
    }

    fn on_transmitted(&mut self, handle: TransactionHandle, outcome: Result<(), EngineError>) {
        let detail = match outcome {
            Ok(()) => "ok".to_string(),
            Err(err) => format!("failed: {err}"),
        };
        self.push(EventRow {
            event: "transmitted",
            client_id: self.client_id,
            handle: Some(handle.0),
            detail,
            link_budget: None,
        });
    }

    fn on_unsolicited(&mut self, payload: &[u8], result: &SessionResult) -> bool {
        self.push(EventRow {
            event: "unsolicited",
            client_id: self.client_id,
            handle: None,
            detail: hex(payload),
            link_budget: Some(result.link_budget),
        });
        true
    }
}

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let store: Box<dyn DeviceStore> = match &args.store {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(MemoryStore::default()),
    };

    let mut engine = SimulatedEngine::new();
    if args.fail {
        engine.push_outcome(SimOutcome::Failed(EngineError::NoAck));
    } else if let Some(response) = &args.respond {
        engine.push_outcome(SimOutcome::Responded(response.as_bytes().to_vec().into()));
    }

    let mut stack = Stack::new(engine, store);
    stack
        .init()
        .map_err(|err| stack_error("stack init failed", err))?;
    if let Some(level) = args.tx_power {
        stack
            .set_tx_power(level)
            .map_err(|err| stack_error("invalid --tx-power", err))?;
    }

    let rows = Arc::new(Mutex::new(Vec::new()));
    let client_id = stack.register(EventLog {
        client_id: 0,
        rows: rows.clone(),
    });

    let mut config = stack
        .active_session_config()
        .map_err(|err| stack_error("session config unavailable", err))?;
    config.addressee.nls_method = args.method;

    let mode = if args.async_mode {
        SendMode::Async
    } else {
        SendMode::Sync
    };
    tracing::debug!(
        client_id = client_id.0,
        len = args.data.len(),
        method = args.method.name(),
        ?mode,
        "sending through simulated engine"
    );
    let sent = stack.send(
        client_id,
        Some(&config),
        args.data.as_bytes(),
        args.expected,
        mode,
    );
    if sent.is_ok() && mode == SendMode::Async {
        stack.process_events();
    }
    stack.stop();

    let rows = rows.lock().map(|rows| rows.clone()).unwrap_or_default();
    print_records(&rows, format);

    sent.map_err(|err| stack_error("send failed", err))?;
    let failed = rows
        .iter()
        .any(|row| row.event == "transmitted" && row.detail != "ok");
    Ok(if failed { FAILURE } else { SUCCESS })
}
