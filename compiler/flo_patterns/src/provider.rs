//! The contract between the evaluator and standard-library providers.
//!
//! A provider is the code behind a `bind`-able module path such as
//! `std/db`. Every call reaches it as `(token, args)`: the evaluator first
//! asks which [`ScopeClaim`]s the call would exercise, has the capability
//! table authorize them against the presented token, and only then invokes
//! the operation. Providers never see the token.
//!
//! Providers translate their native failures into an error value (a map
//! with at least a `message` field, see [`error_value`]).

use std::fmt;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use flo_caps::{CapabilityKind, ScopeClaim};
use rustc_hash::FxHashMap;

use crate::value::{MapValue, Value};

/// Outcome of a provider operation: `Ok(value)` or `Err(error_value)`.
pub type ProviderResult = Result<Value, Value>;

/// Reply to [`Provider::invoke`].
#[derive(Debug)]
pub enum ProviderReply {
    /// Completed synchronously.
    Ready(ProviderResult),
    /// Completes later, from any thread, through the paired [`Resolver`].
    Deferred(Deferred),
}

/// An effectful standard-library module.
pub trait Provider: Send + Sync {
    /// Module path this provider answers to, e.g. `std/db`.
    fn path(&self) -> &str;

    /// Capability every call requires.
    fn capability(&self) -> CapabilityKind;

    /// Operation names, in a stable order.
    fn operations(&self) -> &[&'static str];

    /// Resources the call would touch. Errors reject malformed arguments
    /// before authorization.
    fn claims(&self, op: &str, args: &MapValue) -> Result<Vec<ScopeClaim>, Value>;

    /// Perform an authorized call.
    fn invoke(&self, op: &str, args: &MapValue) -> ProviderReply;
}

/// Build a provider error value: `{message: ...}`.
pub fn error_value(message: impl Into<String>) -> Value {
    Value::map_from_str_pairs([("message", Value::string(message.into()))])
}

/// Create a one-shot completion pair.
pub fn deferred() -> (Resolver, Deferred) {
    let (sender, receiver) = crossbeam_channel::bounded(1);
    (Resolver { sender }, Deferred { receiver })
}

/// Sending half of a deferred provider call.
#[derive(Debug)]
pub struct Resolver {
    sender: Sender<ProviderResult>,
}

impl Resolver {
    /// Complete the call. Completing a call nobody waits for is a no-op.
    pub fn resolve(self, result: ProviderResult) {
        let _ = self.sender.send(result);
    }
}

/// Receiving half of a deferred provider call.
pub struct Deferred {
    receiver: Receiver<ProviderResult>,
}

impl Deferred {
    /// The completion, if it has arrived.
    ///
    /// A resolver dropped without resolving yields an error value.
    pub fn try_take(&self) -> Option<ProviderResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(error_value(
                "provider dropped a pending operation without completing it",
            ))),
        }
    }

    /// Channel to select on while waiting.
    pub fn receiver(&self) -> &Receiver<ProviderResult> {
        &self.receiver
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("ready", &!self.receiver.is_empty())
            .finish()
    }
}

/// Providers by module path.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: FxHashMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` under its own path, replacing any previous one.
    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        self.providers.insert(provider.path().to_owned(), provider);
    }

    #[must_use]
    pub fn with(mut self, provider: Arc<dyn Provider>) -> Self {
        self.register(provider);
        self
    }

    pub fn get(&self, path: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(path).cloned()
    }

    /// Registered paths, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("paths", &self.paths())
            .finish()
    }
}
