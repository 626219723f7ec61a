//! Interface-thread task marshaling.
//!
//! Widget and document state may only be written from the interface
//! thread. An [`EventLoop`] is created on that thread and pumped by the
//! host; any thread can hold a [`Marshaller`] and submit work to it.
//! Submissions from the interface thread itself run inline, everything
//! else is queued and executed in submission order by the loop.

use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::thread::{self, ThreadId};

use crossbeam::channel::{self, Receiver, Sender};

use vellum_types::error::{PaneError, Result};

type Task = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Run(Task),
    Quit,
}

// ---------------------------------------------------------------------------
// EventLoop
// ---------------------------------------------------------------------------

/// Single-consumer task queue bound to the thread that created it.
///
/// `EventLoop` is deliberately `!Send`: it can only be pumped from the
/// interface thread.
pub struct EventLoop {
    owner: ThreadId,
    tx: Sender<Message>,
    rx: Receiver<Message>,
    _not_send: PhantomData<Rc<()>>,
}

impl EventLoop {
    /// Create an event loop owned by the calling thread.
    pub fn new() -> Self {
        let (tx, rx) = channel::unbounded();
        Self {
            owner: thread::current().id(),
            tx,
            rx,
            _not_send: PhantomData,
        }
    }

    /// A handle for submitting work to this loop.
    pub fn marshaller(&self) -> Marshaller {
        Marshaller {
            owner: self.owner,
            tx: self.tx.clone(),
        }
    }

    /// Number of queued tasks that have not run yet.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Run every task queued so far without blocking. Returns the number of
    /// tasks executed. A queued quit request is consumed and ignored.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(message) = self.rx.try_recv() {
            if let Message::Run(task) = message {
                run_task(task);
                ran += 1;
            }
        }
        ran
    }

    /// Block, running tasks as they arrive, until [`Marshaller::quit`] is
    /// called.
    pub fn run(&self) {
        log::debug!("event loop running");
        // The loop holds a sender itself, so `recv` only fails if the
        // channel is torn down underneath us.
        while let Ok(message) = self.rx.recv() {
            match message {
                Message::Run(task) => run_task(task),
                Message::Quit => break,
            }
        }
        log::debug!("event loop stopped");
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

fn run_task(task: Task) {
    if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
        log::error!("marshaled task panicked; continuing event loop");
    }
}

// ---------------------------------------------------------------------------
// Marshaller
// ---------------------------------------------------------------------------

/// Cloneable, thread-safe handle that routes work to the interface thread.
#[derive(Clone)]
pub struct Marshaller {
    owner: ThreadId,
    tx: Sender<Message>,
}

impl Marshaller {
    /// Whether the calling thread is the interface thread.
    pub fn is_interface_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Run `op` on the interface thread.
    ///
    /// Runs immediately when already on the interface thread. Otherwise the
    /// task is queued and this returns without waiting; its effects are not
    /// visible until the loop has executed it.
    pub fn submit<F>(&self, op: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_interface_thread() {
            op();
        } else if self.tx.send(Message::Run(Box::new(op))).is_err() {
            log::warn!("event loop closed; dropping marshaled task");
        }
    }

    /// Run `op` on the interface thread and wait for its result.
    ///
    /// From a foreign thread this blocks until the loop gets to the task, so
    /// the interface thread must be pumping. Fails with
    /// [`PaneError::TaskAborted`] if the loop is gone or the task panicked.
    pub fn submit_and_wait<R, F>(&self, op: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        if self.is_interface_thread() {
            return Ok(op());
        }
        let (done_tx, done_rx) = channel::bounded(1);
        self.submit(move || {
            let _ = done_tx.send(op());
        });
        done_rx.recv().map_err(|_| PaneError::TaskAborted)
    }

    /// Ask [`EventLoop::run`] to return after the tasks queued before this
    /// call.
    pub fn quit(&self) {
        let _ = self.tx.send(Message::Quit);
    }
}

impl std::fmt::Debug for Marshaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Marshaller")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}
