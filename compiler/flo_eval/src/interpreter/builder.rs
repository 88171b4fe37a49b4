//! `InterpreterBuilder` for creating configured interpreters.

use std::sync::Arc;

use flo_caps::CapabilityTable;
use flo_ir::{ExprArena, StringInterner};
use flo_patterns::ProviderRegistry;

use super::strands::{Parker, StrandRuntime};
use super::{Interpreter, DEFAULT_MAX_CALL_DEPTH};
use crate::{stdout_handler, Environment, SharedPrintHandler, MAIN};

/// Builder for [`Interpreter`].
///
/// Defaults: an empty capability table (every `request cap` is denied), no
/// providers, output on stdout, builtins bound in a fresh root frame and a
/// recursion limit of [`DEFAULT_MAX_CALL_DEPTH`] nested calls.
pub struct InterpreterBuilder<'a> {
    interner: &'a StringInterner,
    env: Option<Environment>,
    capabilities: Option<Arc<CapabilityTable>>,
    providers: ProviderRegistry,
    print_handler: Option<SharedPrintHandler>,
    max_call_depth: usize,
}

impl<'a> InterpreterBuilder<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        Self {
            interner,
            env: None,
            capabilities: None,
            providers: ProviderRegistry::new(),
            print_handler: None,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    /// Root environment. Should have been created with the same interner.
    #[must_use]
    pub fn env(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }

    #[must_use]
    pub fn capabilities(mut self, table: Arc<CapabilityTable>) -> Self {
        self.capabilities = Some(table);
        self
    }

    #[must_use]
    pub fn providers(mut self, providers: ProviderRegistry) -> Self {
        self.providers = providers;
        self
    }

    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn build(self) -> Interpreter<'a> {
        Interpreter {
            interner: self.interner,
            arena: Arc::new(ExprArena::new()),
            env: self
                .env
                .unwrap_or_else(|| Environment::with_builtins(self.interner)),
            capabilities: self
                .capabilities
                .unwrap_or_else(|| Arc::new(CapabilityTable::empty())),
            providers: self.providers,
            strands: Arc::new(StrandRuntime::default()),
            strand: MAIN,
            parker: Parker::new(),
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            call_depth: 0,
            max_call_depth: self.max_call_depth,
        }
    }
}
