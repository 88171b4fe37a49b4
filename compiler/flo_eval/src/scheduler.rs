//! Cooperative strand scheduler.
//!
//! Bookkeeping only: the scheduler owns task states, the FIFO ready queue
//! and the wait-for edges between executors, while the interpreter does
//! the running (see `interpreter/strands.rs`).
//!
//! An executor is the module body ([`MAIN`]) or a started strand. Each one
//! is either running or parked on exactly one task. An executor parks only
//! after [`Scheduler::next_turn`] has chosen who runs next, so exactly one
//! executor evaluates at a time.
//!
//! Two kinds of task share one id space:
//! - strands, created by `strand do ... end`, which start `Pending`
//! - external tasks, created when a provider call replies `Deferred`, which
//!   sit in `External` until their completion channel fires

use std::collections::VecDeque;

use crossbeam_channel::{Select, Sender};
use flo_ir::{SharedArena, StmtRange};
use flo_patterns::{provider_error, Deferred, EvalError, SharedScope, StrandId, Value};
use rustc_hash::{FxHashMap, FxHashSet};

/// The executor running the module body. Never a task; task ids start at 1.
pub const MAIN: StrandId = StrandId::new(0);

/// Everything needed to start a strand body.
#[derive(Clone, Debug)]
pub struct StrandTask {
    pub body: StmtRange,
    pub arena: SharedArena,
    /// Frame that was current at `strand do`; the body runs in a child of it.
    pub frame: SharedScope,
}

/// Lifecycle of a task.
#[derive(Debug)]
pub enum StrandState {
    /// Queued, not started.
    Pending(StrandTask),
    /// The strand currently evaluating.
    Running,
    /// Started, parked on an `await`.
    Suspended,
    /// Waiting on a provider's completion channel.
    External(Deferred),
    Completed(Value),
    Failed(Box<EvalError>),
}

impl StrandState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StrandState::Completed(_) | StrandState::Failed(_))
    }
}

/// What an `await` on a task can do right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AwaitStatus {
    /// Terminal; read it with [`Scheduler::outcome`].
    Finished,
    /// Not finished; park until it is.
    Waiting,
    /// The task is waiting, directly or through others, on the awaiter.
    Cycle,
    Unknown,
}

/// Who gets the turn next.
#[derive(Debug)]
pub enum Turn {
    /// Start a pending strand on a fresh executor.
    Start(StrandId, StrandTask),
    /// Wake a parked executor through its channel.
    Resume(StrandId, Sender<()>),
}

/// Task states, the ready queue and the wait-for graph.
#[derive(Debug, Default)]
pub struct Scheduler {
    states: FxHashMap<StrandId, StrandState>,
    /// Pending strands to start and parked executors to resume, FIFO.
    ready: VecDeque<StrandId>,
    /// External tasks still waiting, in creation order.
    external: Vec<StrandId>,
    /// Executor to the task it is parked on.
    waiting_on: FxHashMap<StrandId, StrandId>,
    /// Task to the executors parked on it, in arrival order.
    awaiters: FxHashMap<StrandId, Vec<StrandId>>,
    /// Wake-up channels of parked executors.
    parked: FxHashMap<StrandId, Sender<()>>,
    /// Terminal tasks whose outcome some `await` has read.
    observed: FxHashSet<StrandId>,
    /// Set once the module body has stopped: pending strands never start
    /// and parked executors are resumed only to unwind.
    closing: bool,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> StrandId {
        self.next_id = self.next_id.saturating_add(1);
        StrandId::new(self.next_id)
    }

    /// Enqueue a new strand. It does not start until someone hands it the
    /// turn.
    pub fn spawn(&mut self, task: StrandTask) -> StrandId {
        let id = self.allocate();
        self.states.insert(id, StrandState::Pending(task));
        self.ready.push_back(id);
        tracing::trace!(strand = %id, queued = self.ready.len(), "strand spawned");
        id
    }

    /// Track a deferred provider call as a task.
    pub fn spawn_external(&mut self, deferred: Deferred) -> StrandId {
        let id = self.allocate();
        self.states.insert(id, StrandState::External(deferred));
        self.external.push(id);
        tracing::trace!(task = %id, "external task registered");
        id
    }

    pub fn state(&self, id: StrandId) -> Option<&StrandState> {
        self.states.get(&id)
    }

    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Look at `id` on behalf of `awaiter`.
    pub fn status(&self, awaiter: StrandId, id: StrandId) -> AwaitStatus {
        match self.states.get(&id) {
            None => AwaitStatus::Unknown,
            Some(state) if state.is_terminal() => AwaitStatus::Finished,
            Some(_) if self.leads_to(id, awaiter) => AwaitStatus::Cycle,
            Some(_) => AwaitStatus::Waiting,
        }
    }

    /// Whether following wait-for edges from `from` reaches `to`.
    fn leads_to(&self, from: StrandId, to: StrandId) -> bool {
        let mut at = from;
        // Edges never form a cycle, so the walk is at most one step per edge.
        for _ in 0..=self.waiting_on.len() {
            if at == to {
                return true;
            }
            match self.waiting_on.get(&at) {
                Some(next) => at = *next,
                None => return false,
            }
        }
        false
    }

    /// Outcome of a terminal task, marking it observed. Terminal states are
    /// never consumed, so every read returns the same result.
    pub fn outcome(&mut self, id: StrandId) -> Option<Result<Value, Box<EvalError>>> {
        let outcome = match self.states.get(&id)? {
            StrandState::Completed(value) => Ok(value.clone()),
            StrandState::Failed(err) => Err(err.clone()),
            _ => return None,
        };
        self.observed.insert(id);
        Some(outcome)
    }

    /// Record that `executor` waits on `task` and will be woken through
    /// `wake`. The caller must check [`status`](Self::status) first.
    pub fn park(&mut self, executor: StrandId, task: StrandId, wake: Sender<()>) {
        if let Some(state) = self.states.get_mut(&executor) {
            if matches!(state, StrandState::Running) {
                *state = StrandState::Suspended;
            }
        }
        self.waiting_on.insert(executor, task);
        self.awaiters.entry(task).or_default().push(executor);
        self.parked.insert(executor, wake);
        tracing::trace!(executor = %executor, on = %task, "parked");
    }

    /// Undo a [`park`](Self::park) that found nobody to hand the turn to.
    pub fn unpark(&mut self, executor: StrandId) {
        self.parked.remove(&executor);
        if let Some(task) = self.waiting_on.remove(&executor) {
            if let Some(awaiters) = self.awaiters.get_mut(&task) {
                awaiters.retain(|id| *id != executor);
            }
        }
        self.mark_running(executor);
    }

    fn mark_running(&mut self, executor: StrandId) {
        if let Some(state) = self.states.get_mut(&executor) {
            if matches!(state, StrandState::Suspended) {
                *state = StrandState::Running;
            }
        }
    }

    /// Record the outcome of strand `id` and queue everyone parked on it.
    pub fn finish(&mut self, id: StrandId, result: Result<Value, Box<EvalError>>) {
        tracing::trace!(strand = %id, ok = result.is_ok(), "strand finished");
        self.states.insert(
            id,
            match result {
                Ok(value) => StrandState::Completed(value),
                Err(err) => StrandState::Failed(err),
            },
        );
        self.release(id);
    }

    /// Drop the wait-for edges into the now terminal `task`, queueing its
    /// awaiters. While closing they are already queued.
    fn release(&mut self, task: StrandId) {
        for executor in self.awaiters.remove(&task).unwrap_or_default() {
            self.waiting_on.remove(&executor);
            if !self.closing {
                self.ready.push_back(executor);
            }
        }
    }

    /// Choose who runs next: the front of the ready queue, after collecting
    /// any finished external tasks. With nothing ready, blocks until an
    /// external task completes. `None` when nobody can run.
    pub fn next_turn(&mut self) -> Option<Turn> {
        loop {
            self.poll_external();
            while let Some(id) = self.ready.pop_front() {
                if let Some(wake) = self.parked.remove(&id) {
                    self.mark_running(id);
                    tracing::trace!(executor = %id, "resumed");
                    return Some(Turn::Resume(id, wake));
                }
                if self.closing {
                    continue;
                }
                let Some(state) = self.states.get_mut(&id) else {
                    continue;
                };
                if !matches!(state, StrandState::Pending(_)) {
                    continue;
                }
                if let StrandState::Pending(task) = std::mem::replace(state, StrandState::Running) {
                    tracing::trace!(strand = %id, "strand started");
                    return Some(Turn::Start(id, task));
                }
            }
            if self.closing || !self.wait_for_external() {
                return None;
            }
        }
    }

    /// Stop scheduling new work. Every parked executor is queued to be
    /// resumed (and to unwind), followed by [`MAIN`] on `wake`. `None` when
    /// nothing was parked and the caller can carry on.
    pub fn close(&mut self, wake: Sender<()>) -> Option<Turn> {
        self.closing = true;
        self.ready.clear();
        let mut parked: Vec<StrandId> = self.parked.keys().copied().collect();
        if parked.is_empty() {
            return None;
        }
        parked.sort_unstable();
        tracing::trace!(parked = parked.len(), "closing");
        self.ready.extend(parked);
        self.parked.insert(MAIN, wake);
        self.ready.push_back(MAIN);
        self.next_turn()
    }

    /// Accept new work again after a [`close`](Self::close).
    pub fn reopen(&mut self) {
        self.closing = false;
    }

    /// Lowest-numbered task that has not reached a terminal state.
    pub fn next_unfinished(&self) -> Option<StrandId> {
        self.states
            .iter()
            .filter(|(_, state)| !state.is_terminal())
            .map(|(id, _)| *id)
            .min()
    }

    /// Move every external task whose completion has arrived to a terminal
    /// state. Returns whether any did.
    fn poll_external(&mut self) -> bool {
        let mut completed = Vec::new();
        let states = &mut self.states;
        self.external.retain(|id| {
            let Some(state) = states.get_mut(id) else {
                return false;
            };
            let StrandState::External(deferred) = state else {
                return false;
            };
            match deferred.try_take() {
                Some(result) => {
                    tracing::trace!(task = %id, ok = result.is_ok(), "external task completed");
                    *state = match result {
                        Ok(value) => StrandState::Completed(value),
                        Err(error) => StrandState::Failed(Box::new(provider_error(error))),
                    };
                    completed.push(*id);
                    false
                }
                None => true,
            }
        });
        for id in &completed {
            self.release(*id);
        }
        !completed.is_empty()
    }

    /// Block the thread until at least one external task can complete.
    /// Returns false when there is nothing to wait for.
    fn wait_for_external(&mut self) -> bool {
        {
            let receivers: Vec<_> = self
                .external
                .iter()
                .filter_map(|id| match self.states.get(id) {
                    Some(StrandState::External(deferred)) => Some(deferred.receiver()),
                    _ => None,
                })
                .collect();
            if receivers.is_empty() {
                return false;
            }
            let mut select = Select::new();
            for receiver in receivers.iter().copied() {
                select.recv(receiver);
            }
            tracing::trace!(waiting = receivers.len(), "blocking on external tasks");
            select.ready();
        }
        self.poll_external();
        true
    }

    /// Failed tasks nobody awaited, in id order.
    pub fn unobserved_failures(&self) -> Vec<(StrandId, &EvalError)> {
        let mut failures: Vec<_> = self
            .states
            .iter()
            .filter(|(id, _)| !self.observed.contains(*id))
            .filter_map(|(id, state)| match state {
                StrandState::Failed(err) => Some((*id, &**err)),
                _ => None,
            })
            .collect();
        failures.sort_by_key(|(id, _)| *id);
        failures
    }
}
