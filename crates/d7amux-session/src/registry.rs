use d7amux_engine::ClientId;
use tracing::debug;

use crate::callbacks::ClientCallbacks;
use crate::error::{Result, StackError};

/// Default client table capacity.
pub const MAX_CLIENT_COUNT: usize = 8;

/// Fixed-capacity table of registered clients.
///
/// Ids are table indices handed out in registration order, so lookup is a
/// bounds check. Entries are never removed individually; [`reset`](Self::reset)
/// drops them all.
pub struct ClientRegistry<const N: usize = MAX_CLIENT_COUNT> {
    clients: [Option<Box<dyn ClientCallbacks>>; N],
    len: usize,
}

impl<const N: usize> ClientRegistry<N> {
    pub fn new() -> Self {
        Self {
            clients: std::array::from_fn(|_| None),
            len: 0,
        }
    }

    /// Register a client, or report a full table without touching it.
    pub fn try_register(&mut self, callbacks: Box<dyn ClientCallbacks>) -> Result<ClientId> {
        let id = match u8::try_from(self.len) {
            Ok(id) if self.len < N => ClientId(id),
            _ => return Err(StackError::RegistryFull { max: N }),
        };
        self.clients[self.len] = Some(callbacks);
        self.len += 1;
        debug!(client_id = id.0, "client registered");
        Ok(id)
    }

    /// Register a client.
    ///
    /// # Panics
    ///
    /// Panics when the table is full. The capacity is a deployment constant,
    /// so overflowing it is a configuration error.
    pub fn register(&mut self, callbacks: Box<dyn ClientCallbacks>) -> ClientId {
        match self.try_register(callbacks) {
            Ok(id) => id,
            Err(err) => panic!("{err}"),
        }
    }

    /// Callbacks of a registered client.
    pub fn lookup(&mut self, id: ClientId) -> Option<&mut (dyn ClientCallbacks + 'static)> {
        if !self.contains(id) {
            return None;
        }
        self.clients[id.index()].as_deref_mut()
    }

    pub fn contains(&self, id: ClientId) -> bool {
        id.index() < self.len
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Drop every registration; ids restart at 0.
    pub fn reset(&mut self) {
        for slot in self.clients.iter_mut() {
            *slot = None;
        }
        self.len = 0;
    }
}

impl<const N: usize> Default for ClientRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use d7amux_engine::{SessionResult, TransactionHandle};

    use super::*;
    use crate::callbacks::FnCallbacks;

    fn noop() -> Box<dyn ClientCallbacks> {
        Box::new(FnCallbacks::new())
    }

    #[test]
    fn ids_are_dense_from_zero() {
        let mut registry: ClientRegistry = ClientRegistry::new();
        for expected in 0..MAX_CLIENT_COUNT {
            assert_eq!(registry.register(noop()), ClientId(expected as u8));
        }
        assert_eq!(registry.len(), MAX_CLIENT_COUNT);
    }

    #[test]
    fn full_table_is_left_untouched() {
        let mut registry = ClientRegistry::<2>::new();
        registry.register(noop());
        registry.register(noop());

        assert!(matches!(
            registry.try_register(noop()),
            Err(StackError::RegistryFull { max: 2 })
        ));
        assert_eq!(registry.len(), 2);
        assert!(!registry.contains(ClientId(2)));
    }

    #[test]
    #[should_panic(expected = "client registry full")]
    fn register_beyond_capacity_panics() {
        let mut registry = ClientRegistry::<1>::new();
        registry.register(noop());
        registry.register(noop());
    }

    #[test]
    fn lookup_returns_the_registered_callbacks() {
        let mut registry = ClientRegistry::<4>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        registry.register(noop());
        let counted = hits.clone();
        let id = registry.register(Box::new(FnCallbacks::new().with_response(
            move |_, _, _| {
                counted.fetch_add(1, Ordering::SeqCst);
            },
        )));

        registry
            .lookup(id)
            .expect("client should be registered")
            .on_response(TransactionHandle(1), b"x", &SessionResult::default());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(registry.lookup(ClientId(2)).is_none());
    }

    #[test]
    fn reset_restarts_ids() {
        let mut registry = ClientRegistry::<4>::new();
        registry.register(noop());
        registry.register(noop());
        registry.reset();

        assert!(registry.is_empty());
        assert!(registry.lookup(ClientId(0)).is_none());
        assert_eq!(registry.register(noop()), ClientId(0));
    }
}
