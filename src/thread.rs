// Copyright 2022 Matthew Ingwersen.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.

//! Thread groups.

use std::fmt;
use std::io;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use log::{debug, error};

////////////////////////////////////////////////////////////////////////
// THREAD GROUPS                                                      //
////////////////////////////////////////////////////////////////////////

/// A group of threads managed together.
///
/// Threads are started in a `ThreadGroup` with
/// [`ThreadGroup::start_oneshot`]; each executes its task once.
///
/// A `ThreadGroup` may be shut down through [`ThreadGroup::shut_down`].
/// New threads cannot be started in a `ThreadGroup` once shutdown is
/// initiated. [`ThreadGroup::await_shutdown`] can be used to wait for
/// shutdown to complete. This condition requires all threads to have
/// exited. Therefore, long-running tasks executing in a group should
/// hold an [`Arc`] reference to the `ThreadGroup` so that they can
/// check for group shutdown ([`ThreadGroup::is_shutting_down`]) and
/// exit when it begins.
pub struct ThreadGroup {
    records: Mutex<GroupRecords>,

    /// Allows threads to wait for group shutdown events. This is used
    /// with the `records` mutex. All waiting threads are notified when
    /// (1) shutdown is initiated and (2) shutdown is complete.
    shutdown_wakeup: Condvar,
}

/// The internal records of a [`ThreadGroup`].
#[derive(Default)]
struct GroupRecords {
    thread_count: usize,
    shutting_down: bool,
}

impl ThreadGroup {
    /// Creates a new thread group.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(GroupRecords::default()),
            shutdown_wakeup: Condvar::new(),
        })
    }

    /// Locks the records. A panic while the lock was held cannot leave
    /// the records inconsistent, so poisoning is ignored.
    fn lock_records(&self) -> MutexGuard<GroupRecords> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a one-shot thread in the `ThreadGroup`. This thread will
    /// execute `task` once. The task will not be restarted, even if the
    /// thread panics.
    pub fn start_oneshot<F>(self: &Arc<Self>, name: Option<String>, task: F) -> Result<(), Error>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut records = self.lock_records();
        if records.shutting_down {
            return Err(Error::ShuttingDown);
        }

        records.thread_count += 1;
        let handle = OneshotHandle {
            group: self.clone(),
            parent: thread::current().id(),
        };
        let result = thread::Builder::new()
            .name(name.unwrap_or_else(|| "anonymous".to_owned()))
            .spawn(move || {
                task();
                drop(handle);
            });
        if result.is_err() {
            records.thread_count -= 1;
        }
        result.map(|_| ()).map_err(Into::into)
    }

    /// Shuts down the `ThreadGroup`.
    pub fn shut_down(&self) {
        let mut records = self.lock_records();
        if !records.shutting_down {
            debug!("Shutting down thread group of {} threads", records.thread_count);
        }
        records.shutting_down = true;
        self.shutdown_wakeup.notify_all();
    }

    /// Waits for the `ThreadGroup` to shut down. This is defined as (1)
    /// shutdown having been initiated ([`ThreadGroup::shut_down`]) and
    /// (2) the thread count having dropped to zero. Note that if this
    /// is called from a thread within the group, a deadlock will occur
    /// (since the thread count will never become zero).
    pub fn await_shutdown(&self) {
        let records = self.lock_records();
        let _guard = self
            .shutdown_wakeup
            .wait_while(records, |r| !r.shutting_down || r.thread_count > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Returns whether the `ThreadGroup` is shutting down.
    pub fn is_shutting_down(&self) -> bool {
        self.lock_records().shutting_down
    }

    /// Returns the number of threads currently running in the group.
    pub fn thread_count(&self) -> usize {
        self.lock_records().thread_count
    }
}

/// A handle to be owned by a one-shot thread. When dropped (when the
/// thread exits or panics), it decrements the group's thread count and
/// wakes waiters if shutdown is complete.
struct OneshotHandle {
    group: Arc<ThreadGroup>,
    parent: ThreadId,
}

impl Drop for OneshotHandle {
    fn drop(&mut self) {
        let current_thread = thread::current();

        // If we are being dropped in the parent thread, then the new
        // thread failed to start (on the OS level). In this case,
        // start_oneshot handles the clean-up, and it still holds the
        // records mutex.
        if current_thread.id() == self.parent {
            return;
        }

        if thread::panicking() {
            let thread_name = current_thread.name().unwrap_or("anonymous");
            error!("Thread {} panicked", thread_name);
        }

        let mut records = self.group.lock_records();
        records.thread_count -= 1;
        if records.shutting_down && records.thread_count == 0 {
            self.group.shutdown_wakeup.notify_all();
        }
    }
}

////////////////////////////////////////////////////////////////////////
// ERRORS                                                             //
////////////////////////////////////////////////////////////////////////

/// An error returned when a thread cannot be started.
#[derive(Debug)]
pub enum Error {
    /// An OS-level error occurred during the creation of a thread.
    Io(io::Error),

    /// The [`ThreadGroup`] is shutting down.
    ShuttingDown,
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Io(err) => err.fmt(f),
            Self::ShuttingDown => f.write_str("thread group is shutting down"),
        }
    }
}

impl std::error::Error for Error {}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn await_shutdown_works() {
        let exited = Arc::new(Mutex::new(0));
        let group = ThreadGroup::new();
        const SLEEP_DURATION: Duration = Duration::from_millis(100);
        let start = Instant::now();
        for _ in 0..2 {
            let exited_cloned = exited.clone();
            let group_cloned = group.clone();
            group
                .start_oneshot(None, move || loop {
                    thread::sleep(SLEEP_DURATION);
                    if group_cloned.is_shutting_down() {
                        *exited_cloned.lock().unwrap() += 1;
                        return;
                    }
                })
                .unwrap();
        }
        group.shut_down();
        group.await_shutdown();
        assert!(Instant::now().duration_since(start) > SLEEP_DURATION);
        assert_eq!(*exited.lock().unwrap(), 2);
        assert_eq!(group.thread_count(), 0);
    }

    #[test]
    fn panicking_threads_are_counted_out() {
        let group = ThreadGroup::new();
        group
            .start_oneshot(Some("doomed".to_owned()), || panic!("expected"))
            .unwrap();
        group.shut_down();
        group.await_shutdown();
        assert_eq!(group.thread_count(), 0);
    }

    #[test]
    fn thread_group_rejects_new_threads_after_shutdown() {
        let group = ThreadGroup::new();
        group.shut_down();
        assert!(matches!(
            group.start_oneshot(None, || ()),
            Err(Error::ShuttingDown)
        ));
    }
}
