/*
 * This module owns the process's three long-lived background workers:
 * network, file I/O, and background compute. Each worker is one named OS
 * thread draining a FIFO queue of boxed work units; the manager performs no
 * work itself, only lifecycle control. Start and stop are deterministic,
 * exactly-once operations guarded by panicking assertions: double start or
 * stop-without-start cannot occur under correct usage and therefore
 * indicates a logic defect, never a recoverable runtime condition.
 *
 * The manager is expected to be driven from a single controlling thread
 * during process initialization and teardown; `start`/`stop` carry no
 * internal locking. `submit` may be called from any thread while the pool
 * is running.
 */
use std::sync::mpsc;
use std::thread;

/// A unit of background work. Runs to completion on its worker thread.
pub type WorkUnit = Box<dyn FnOnce() + Send + 'static>;

/*
 * The three fixed worker roles. The set is closed: sizing, iteration, and
 * slot indexing all derive from `ALL`, which keeps start/stop symmetric
 * without three ad hoc named fields.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerRole {
    Network,
    File,
    Background,
}

impl WorkerRole {
    pub const ALL: [WorkerRole; 3] = [WorkerRole::Network, WorkerRole::File, WorkerRole::Background];

    pub fn thread_name(self) -> &'static str {
        match self {
            WorkerRole::Network => "worker-network",
            WorkerRole::File => "worker-file",
            WorkerRole::Background => "worker-background",
        }
    }

    fn index(self) -> usize {
        match self {
            WorkerRole::Network => 0,
            WorkerRole::File => 1,
            WorkerRole::Background => 2,
        }
    }
}

/*
 * One running worker: the sending half of its queue plus the join handle of
 * its thread. Shutdown drops the sender, which lets the thread finish every
 * queued unit before `recv` disconnects, then joins. Exclusively owned by
 * the manager; never aliased.
 */
struct Worker {
    queue: mpsc::Sender<WorkUnit>,
    handle: thread::JoinHandle<()>,
}

impl Worker {
    fn spawn(role: WorkerRole) -> Self {
        let (queue, receiver) = mpsc::channel::<WorkUnit>();
        let handle = thread::Builder::new()
            .name(role.thread_name().to_string())
            .spawn(move || {
                while let Ok(work_unit) = receiver.recv() {
                    work_unit();
                }
                log::trace!("WorkerPool: {} drained and exiting", role.thread_name());
            })
            .unwrap_or_else(|e| {
                panic!("WorkerPool: failed to spawn {} thread: {e}", role.thread_name())
            });
        Worker { queue, handle }
    }

    /*
     * Blocks until the queue is drained and the thread has terminated.
     * There is no timeout; callers needing bounded shutdown must arrange
     * work-unit-level cancellation before calling this.
     */
    fn shutdown_and_join(self, role: WorkerRole) {
        drop(self.queue);
        if self.handle.join().is_err() {
            log::error!(
                "WorkerPool: {} panicked while draining its queue",
                role.thread_name()
            );
        }
    }
}

/*
 * Lifecycle owner of the three workers. Holds an arena of exactly three
 * slots indexed by `WorkerRole`; a slot is `Some` only between `start` and
 * `stop`.
 */
pub struct WorkerPoolManager {
    slots: [Option<Worker>; 3],
}

impl WorkerPoolManager {
    pub fn new() -> Self {
        WorkerPoolManager {
            slots: [None, None, None],
        }
    }

    pub fn is_running(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /*
     * Spawns the three workers. Calling this while any worker exists is a
     * programming error and panics.
     */
    pub fn start(&mut self) {
        assert!(
            self.slots.iter().all(Option::is_none),
            "WorkerPool: start() called while workers are already running"
        );
        for role in WorkerRole::ALL {
            self.slots[role.index()] = Some(Worker::spawn(role));
        }
        log::debug!("WorkerPool: started {} workers", WorkerRole::ALL.len());
    }

    /*
     * Enqueues a work unit on one worker. Units submitted to the same
     * worker complete in submission order; there is no ordering guarantee
     * across workers. Panics when called outside the running state.
     */
    pub fn submit<F>(&self, role: WorkerRole, work_unit: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let worker = self.slots[role.index()]
            .as_ref()
            .unwrap_or_else(|| panic!("WorkerPool: submit() on {role:?} before start()"));
        if worker.queue.send(Box::new(work_unit)).is_err() {
            // Only reachable when the worker thread died mid-run.
            log::error!("WorkerPool: {role:?} queue is gone; work unit dropped");
        }
    }

    /*
     * Signals each worker to stop accepting work, waits for each to drain
     * its queue and terminate, then releases all three slots. Blocks the
     * calling thread (join semantics, no timeout). Calling this when the
     * workers do not exist is a programming error and panics.
     */
    pub fn stop(&mut self) {
        assert!(
            self.slots.iter().all(Option::is_some),
            "WorkerPool: stop() called without a preceding start()"
        );
        for role in WorkerRole::ALL {
            let worker = self.slots[role.index()].take().unwrap();
            worker.shutdown_and_join(role);
        }
        log::debug!("WorkerPool: all workers stopped");
    }

    /*
     * Hardware concurrency of the host, never less than 1: an unknown or
     * zero answer from the OS query normalizes to 1 so downstream sizing
     * logic never divides by, or spawns, zero.
     */
    pub fn cpu_core_count() -> usize {
        thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(1)
    }
}

impl Default for WorkerPoolManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[test]
    fn test_start_then_stop_releases_all_workers() {
        // Arrange
        let mut pool = WorkerPoolManager::new();
        assert!(!pool.is_running());

        // Act
        pool.start();
        assert!(pool.is_running());
        pool.stop();

        // Assert
        assert!(!pool.is_running());
    }

    #[test]
    #[should_panic(expected = "start() called while workers are already running")]
    fn test_double_start_is_a_programming_error() {
        let mut pool = WorkerPoolManager::new();
        pool.start();
        pool.start();
    }

    #[test]
    #[should_panic(expected = "stop() called without a preceding start()")]
    fn test_stop_without_start_is_a_programming_error() {
        let mut pool = WorkerPoolManager::new();
        pool.stop();
    }

    #[test]
    #[should_panic(expected = "submit() on File before start()")]
    fn test_submit_before_start_is_a_programming_error() {
        let pool = WorkerPoolManager::new();
        pool.submit(WorkerRole::File, || {});
    }

    #[test]
    fn test_stop_blocks_until_submitted_work_completes() {
        // Arrange
        let mut pool = WorkerPoolManager::new();
        pool.start();
        let completed = Arc::new(AtomicUsize::new(0));
        for _ in 0..8 {
            let completed = Arc::clone(&completed);
            pool.submit(WorkerRole::Background, move || {
                // Slow enough that the units are still queued when stop()
                // begins, fast enough to keep the test snappy.
                std::thread::sleep(Duration::from_millis(5));
                completed.fetch_add(1, Ordering::SeqCst);
            });
        }

        // Act: stop() must not return before the queue drains.
        pool.stop();

        // Assert
        assert_eq!(
            completed.load(Ordering::SeqCst),
            8,
            "Every unit submitted before stop() must have completed when stop() returns"
        );
    }

    #[test]
    fn test_units_on_one_worker_run_in_submission_order() {
        // Arrange
        let mut pool = WorkerPoolManager::new();
        pool.start();
        let observed = Arc::new(Mutex::new(Vec::new()));
        for i in 0..32 {
            let observed = Arc::clone(&observed);
            pool.submit(WorkerRole::File, move || {
                observed.lock().unwrap().push(i);
            });
        }

        // Act
        pool.stop();

        // Assert: FIFO within the worker.
        let observed = observed.lock().unwrap();
        assert_eq!(*observed, (0..32).collect::<Vec<_>>());
    }

    #[test]
    fn test_workers_carry_their_role_names() {
        // Arrange
        let mut pool = WorkerPoolManager::new();
        pool.start();
        let names = Arc::new(Mutex::new(Vec::new()));
        for role in WorkerRole::ALL {
            let names = Arc::clone(&names);
            pool.submit(role, move || {
                let name = std::thread::current().name().map(str::to_string);
                names.lock().unwrap().push((role, name));
            });
        }

        // Act
        pool.stop();

        // Assert
        let names = names.lock().unwrap();
        assert_eq!(names.len(), 3);
        for (role, name) in names.iter() {
            assert_eq!(
                name.as_deref(),
                Some(role.thread_name()),
                "Work for {role:?} must run on its own named thread"
            );
        }
    }

    #[test]
    fn test_pool_is_restartable_after_stop() {
        // A full stop releases ownership; a fresh start is legal.
        let mut pool = WorkerPoolManager::new();
        pool.start();
        pool.stop();
        pool.start();
        let ran = Arc::new(AtomicUsize::new(0));
        let ran_clone = Arc::clone(&ran);
        pool.submit(WorkerRole::Network, move || {
            ran_clone.fetch_add(1, Ordering::SeqCst);
        });
        pool.stop();
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cpu_core_count_is_never_zero() {
        assert!(
            WorkerPoolManager::cpu_core_count() >= 1,
            "A zero or unknown hardware answer must normalize to 1"
        );
    }
}
