//! Fixed-size worker pool with a task-completion barrier.
//!
//! Workers drain a single FIFO queue; tasks may run in any order and
//! concurrently. The driver thread produces tasks and synchronizes phases by
//! waiting for the pending counter to drain to zero.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

use crossbeam_channel::{unbounded, Sender};

use crate::error::{BbhError, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Pending {
    count: Mutex<usize>,
    idle: Condvar,
}

pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
    pending: Arc<Pending>,
}

impl WorkerPool {
    /// Spawn `threads` workers. Fails on a zero thread count.
    pub fn new(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(BbhError::config("thread count must be positive"));
        }

        let (sender, receiver) = unbounded::<Job>();
        let pending = Arc::new(Pending {
            count: Mutex::new(0),
            idle: Condvar::new(),
        });

        let workers = (0..threads)
            .map(|_| {
                let receiver = receiver.clone();
                let pending = Arc::clone(&pending);
                std::thread::spawn(move || {
                    for job in receiver.iter() {
                        job();
                        // The job and everything it captured is dropped
                        // before the counter goes down.
                        let mut count = pending.count.lock().unwrap();
                        *count -= 1;
                        if *count == 0 {
                            pending.idle.notify_all();
                        }
                    }
                })
            })
            .collect();

        Ok(Self {
            sender: Some(sender),
            workers,
            pending,
        })
    }

    /// Enqueue a task; returns immediately.
    pub fn execute<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        *self.pending.count.lock().unwrap() += 1;
        self.sender
            .as_ref()
            .expect("pool is stopped")
            .send(Box::new(task))
            .expect("worker threads alive");
    }

    /// True when no task is queued and none is running.
    pub fn tasks_completed(&self) -> bool {
        *self.pending.count.lock().unwrap() == 0
    }

    /// Block until every enqueued task has finished.
    pub fn wait_idle(&self) {
        let mut count = self.pending.count.lock().unwrap();
        while *count > 0 {
            count = self.pending.idle.wait(count).unwrap();
        }
    }

    /// Drain pending tasks, then join the workers.
    pub fn stop(&mut self) {
        // Closing the channel lets workers finish the queue and exit.
        if self.sender.take().is_some() {
            for handle in self.workers.drain(..) {
                let _ = handle.join();
            }
        }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}
