//! Running strands: `strand do ... end`, `await` and the final drain.
//!
//! Every started strand gets its own executor: an [`Interpreter`] on its
//! own scoped thread, so a strand parked on an `await` keeps its native
//! stack and resumes exactly where it stopped. Executors pass a single turn
//! between them through the [`Scheduler`]; whoever gives up the turn picks
//! the next executor, wakes it (or asks the dispatcher to start it) and only
//! then parks. Strands never start when created, only when handed the turn.
//!
//! Threads are spawned by a dispatcher living for the duration of
//! [`Interpreter::run_module`]; outside it, `await` can only read tasks that
//! have already finished.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};
use flo_ir::{Module, StmtRange};
use flo_patterns::{
    await_cycle, strand_cancelled, unknown_strand, ControlAction, EvalError, EvalResult,
    StrandId, Value,
};
use flo_stack::ensure_sufficient_stack;
use parking_lot::Mutex;

use super::Interpreter;
use crate::{AwaitStatus, Scheduler, StrandTask, Turn};

/// Request to the dispatcher: start this strand on a new executor.
type Start = (StrandId, StrandTask);

/// Scheduler state shared by every executor of one interpreter.
#[derive(Debug, Default)]
pub(crate) struct StrandRuntime {
    pub(crate) scheduler: Mutex<Scheduler>,
    /// Present while a module runs.
    dispatcher: Mutex<Option<Sender<Start>>>,
}

impl StrandRuntime {
    fn is_dispatching(&self) -> bool {
        self.dispatcher.lock().is_some()
    }

    /// Give the turn away. A strand the dispatcher cannot start fails at
    /// once and the turn moves on.
    fn hand_over(&self, scheduler: &mut Scheduler, mut turn: Turn) {
        loop {
            match turn {
                Turn::Resume(_, wake) => {
                    // Capacity one and only the parked executor drains it.
                    let _ = wake.try_send(());
                    return;
                }
                Turn::Start(id, task) => {
                    let sent = match self.dispatcher.lock().as_ref() {
                        Some(dispatcher) => dispatcher.send((id, task)).is_ok(),
                        None => false,
                    };
                    if sent {
                        return;
                    }
                    let err = EvalError::new(format!("{id} cannot start: no module is running"));
                    scheduler.finish(id, Err(Box::new(err)));
                    match scheduler.next_turn() {
                        Some(next) => turn = next,
                        None => return,
                    }
                }
            }
        }
    }
}

/// An executor's wake-up channel.
#[derive(Clone, Debug)]
pub(crate) struct Parker {
    wake: Sender<()>,
    wait: Receiver<()>,
}

impl Parker {
    pub(crate) fn new() -> Self {
        let (wake, wait) = crossbeam_channel::bounded(1);
        Parker { wake, wait }
    }

    fn waker(&self) -> Sender<()> {
        self.wake.clone()
    }

    /// Block until handed the turn. This parker holds a sender itself, so
    /// the channel never disconnects.
    fn park(&self) {
        let _ = self.wait.recv();
    }
}

/// Open for the duration of one module run. Dropping it, on any exit path,
/// lets parked strands unwind one at a time and then stops the dispatcher.
struct ModuleRun {
    runtime: Arc<StrandRuntime>,
    parker: Parker,
}

impl ModuleRun {
    fn open(runtime: &Arc<StrandRuntime>, parker: &Parker, dispatcher: Sender<Start>) -> Self {
        runtime.scheduler.lock().reopen();
        *runtime.dispatcher.lock() = Some(dispatcher);
        ModuleRun {
            runtime: Arc::clone(runtime),
            parker: parker.clone(),
        }
    }
}

impl Drop for ModuleRun {
    fn drop(&mut self) {
        let parked = {
            let mut scheduler = self.runtime.scheduler.lock();
            match scheduler.close(self.parker.waker()) {
                Some(turn) => {
                    self.runtime.hand_over(&mut scheduler, turn);
                    true
                }
                None => false,
            }
        };
        if parked {
            self.parker.park();
        }
        *self.runtime.dispatcher.lock() = None;
    }
}

impl<'a> Interpreter<'a> {
    /// Run the module body on this thread while a dispatcher thread starts
    /// strand executors on demand.
    pub(super) fn run_with_strands(&mut self, module: &Module) -> Result<Value, EvalError> {
        let template = self.fork(self.strand);
        let (dispatcher, starts) = crossbeam_channel::unbounded::<Start>();
        thread::scope(|threads| {
            let run = ModuleRun::open(&self.strands, &self.parker, dispatcher);
            threads.spawn(move || {
                for (id, task) in starts {
                    let executor = template.fork(id);
                    threads.spawn(move || executor.execute_strand(id, task));
                }
            });
            let result = self.run_main(module);
            drop(run);
            result
        })
    }

    /// A fresh executor for `strand` sharing this interpreter's
    /// configuration, module frame and scheduler.
    fn fork(&self, strand: StrandId) -> Interpreter<'a> {
        Interpreter {
            interner: self.interner,
            arena: Arc::clone(&self.arena),
            env: self.env.enter(self.env.global().clone()),
            capabilities: Arc::clone(&self.capabilities),
            providers: self.providers.clone(),
            strands: Arc::clone(&self.strands),
            strand,
            parker: Parker::new(),
            print_handler: Arc::clone(&self.print_handler),
            call_depth: 0,
            max_call_depth: self.max_call_depth,
        }
    }

    /// Enqueue the body as a new strand capturing the current frame.
    pub(super) fn spawn_strand(&mut self, body: StmtRange) -> Value {
        let task = StrandTask {
            body,
            arena: Arc::clone(&self.arena),
            frame: self.env.current().clone(),
        };
        Value::strand(self.strands.scheduler.lock().spawn(task))
    }

    /// `await target`
    ///
    /// Only strand handles suspend; any other value is already available
    /// and is returned unchanged, so `await` works on provider calls that
    /// happened to complete synchronously.
    pub(super) fn eval_await(&mut self, target: Value) -> EvalResult {
        match target {
            Value::Strand(handle) => Ok(self.await_strand(handle.id)?),
            other => Ok(other),
        }
    }

    /// Suspend until `id` is terminal, then return its value or re-raise
    /// its error.
    pub fn await_strand(&mut self, id: StrandId) -> Result<Value, EvalError> {
        self.wait_for(id)?;
        match self.strands.scheduler.lock().outcome(id) {
            Some(outcome) => outcome.map_err(|err| *err),
            None => Err(unknown_strand(id.raw())),
        }
    }

    /// Park this executor until `id` is terminal, without reading it.
    fn wait_for(&mut self, id: StrandId) -> Result<(), EvalError> {
        let runtime = Arc::clone(&self.strands);
        loop {
            {
                let mut scheduler = runtime.scheduler.lock();
                match scheduler.status(self.strand, id) {
                    AwaitStatus::Finished => return Ok(()),
                    AwaitStatus::Cycle => return Err(await_cycle(id.raw())),
                    AwaitStatus::Unknown => return Err(unknown_strand(id.raw())),
                    AwaitStatus::Waiting => {}
                }
                if scheduler.is_closing() {
                    return Err(strand_cancelled(self.strand.raw()));
                }
                if !runtime.is_dispatching() {
                    return Err(EvalError::new(format!(
                        "{id} cannot run: no module is running"
                    )));
                }
                scheduler.park(self.strand, id, self.parker.waker());
                let Some(turn) = scheduler.next_turn() else {
                    scheduler.unpark(self.strand);
                    return Err(EvalError::new(format!("{id} can never complete")));
                };
                runtime.hand_over(&mut scheduler, turn);
            }
            self.parker.park();
        }
    }

    /// Body of a strand executor's thread: run the strand, record its
    /// outcome and pass the turn on. A panic fails the strand instead of
    /// keeping the turn forever.
    fn execute_strand(mut self, id: StrandId, task: StrandTask) {
        let run = AssertUnwindSafe(|| ensure_sufficient_stack(|| self.run_strand(id, task)));
        let result = panic::catch_unwind(run).unwrap_or_else(|_| {
            tracing::error!(strand = %id, "strand executor panicked");
            Err(Box::new(EvalError::new(format!("{id} panicked"))))
        });
        let mut scheduler = self.strands.scheduler.lock();
        scheduler.finish(id, result);
        if let Some(turn) = scheduler.next_turn() {
            self.strands.hand_over(&mut scheduler, turn);
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(strand = %id))]
    fn run_strand(&mut self, id: StrandId, task: StrandTask) -> Result<Value, Box<EvalError>> {
        let frame = task.frame.child();
        let result = self.with_frame(frame, task.arena, |strand| strand.eval_stmts(task.body));
        match result {
            Ok(value) | Err(ControlAction::Return(value)) => Ok(value),
            Err(ControlAction::Error(mut err)) => {
                let span = err.span;
                err.push_frame("<strand>", span);
                Err(err)
            }
        }
    }

    /// Run every task still unfinished when the module body ends, in id
    /// order, and wait for every pending provider call.
    ///
    /// Failures nobody awaited are logged, not raised.
    pub(crate) fn drain_strands(&mut self) {
        loop {
            let next = self.strands.scheduler.lock().next_unfinished();
            let Some(id) = next else { break };
            if let Err(err) = self.wait_for(id) {
                tracing::warn!(strand = %id, error = %err, "could not drain strand");
                break;
            }
        }
        let scheduler = self.strands.scheduler.lock();
        for (id, err) in scheduler.unobserved_failures() {
            tracing::warn!(strand = %id, error = %err, "strand failed and was never awaited");
        }
    }
}
