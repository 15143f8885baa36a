//! Fixed-size launch pool.
//!
//! Jobs are queued on an unbounded `crossbeam-channel` and picked up by a fixed
//! set of named threads. Each thread reports [`Feedback`] on a second channel
//! that only the main thread drains. Submission never blocks, so a hung launch
//! cannot stall gesture dispatch.
//!
//! [`LaunchPool::shutdown`] cancels queued jobs and returns at once; launches
//! already running are left to finish on their own.

use crate::domain::{LauncherError, Result};
use crate::worker::handler::LaunchWorker;
use crate::worker::launcher::Launcher;
use crate::worker::{Feedback, WorkerMessage};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default number of launch threads.
pub const DEFAULT_WORKER_COUNT: usize = 3;

/// Handle to the launch threads.
pub struct LaunchPool {
    jobs: Option<Sender<WorkerMessage>>,
    cancelled: Arc<AtomicBool>,
    worker_count: usize,
}

impl LaunchPool {
    /// Spawns `worker_count` threads and returns the pool with the receiving
    /// end of the feedback channel.
    ///
    /// # Errors
    ///
    /// [`LauncherError::Config`] for a zero worker count,
    /// [`LauncherError::Worker`] if a thread could not be spawned.
    pub fn new(worker_count: usize, launcher: Arc<dyn Launcher>) -> Result<(Self, Receiver<Feedback>)> {
        if worker_count == 0 {
            return Err(LauncherError::Config("worker_count must be at least 1".to_string()));
        }

        let (job_tx, job_rx) = unbounded::<WorkerMessage>();
        let (feedback_tx, feedback_rx) = unbounded::<Feedback>();
        let cancelled = Arc::new(AtomicBool::new(false));
        let worker = LaunchWorker::new(launcher);

        for index in 0..worker_count {
            let jobs = job_rx.clone();
            let feedback = feedback_tx.clone();
            let cancelled = Arc::clone(&cancelled);
            let worker = worker.clone();

            std::thread::Builder::new()
                .name(format!("instant-access-{index}"))
                .spawn(move || worker_loop(&worker, &jobs, &feedback, &cancelled))
                .map_err(|e| LauncherError::Worker(format!("could not spawn launch thread: {e}")))?;
        }

        tracing::debug!(worker_count, "launch pool started");
        Ok((
            Self {
                jobs: Some(job_tx),
                cancelled,
                worker_count,
            },
            feedback_rx,
        ))
    }

    /// Queues a job and returns immediately.
    ///
    /// # Errors
    ///
    /// [`LauncherError::Worker`] after [`shutdown`](Self::shutdown).
    pub fn submit(&self, message: WorkerMessage) -> Result<()> {
        let jobs = self
            .jobs
            .as_ref()
            .ok_or_else(|| LauncherError::Worker("launch pool is shut down".to_string()))?;
        tracing::debug!(origin = message.origin(), item = %message.item().name, "job queued");
        jobs.send(message)
            .map_err(|_| LauncherError::Worker("launch threads have exited".to_string()))
    }

    /// Stops accepting jobs and drops the queued ones. Does not wait.
    pub fn shutdown(&mut self) {
        if self.jobs.take().is_some() {
            self.cancelled.store(true, Ordering::SeqCst);
            tracing::debug!(worker_count = self.worker_count, "launch pool shut down");
        }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.jobs.is_some()
    }

    #[must_use]
    pub const fn worker_count(&self) -> usize {
        self.worker_count
    }
}

impl Drop for LaunchPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(
    worker: &LaunchWorker,
    jobs: &Receiver<WorkerMessage>,
    feedback: &Sender<Feedback>,
    cancelled: &AtomicBool,
) {
    for message in jobs {
        if cancelled.load(Ordering::SeqCst) {
            break;
        }
        let mut connected = true;
        worker.handle_message(&message, &mut |reply| {
            connected &= feedback.send(reply).is_ok();
        });
        if !connected {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Item, ItemKind};
    use crate::worker::launcher::ProgramLaunch;
    use std::io;
    use std::path::Path;
    use std::time::Duration;

    struct Accepting;

    impl Launcher for Accepting {
        fn open_url(&self, _url: &str) -> io::Result<()> {
            Ok(())
        }

        fn open_path(&self, _path: &Path) -> io::Result<()> {
            Ok(())
        }

        fn spawn_program(&self, _program: &ProgramLaunch) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn feedback_arrives_on_the_receiver() {
        let (pool, feedback) = LaunchPool::new(DEFAULT_WORKER_COUNT, Arc::new(Accepting)).unwrap();
        let item = Item::new("Example", ItemKind::Website, "");

        pool.submit(WorkerMessage::launch(item)).unwrap();

        let first = feedback.recv_timeout(Duration::from_secs(5)).unwrap();
        let second = feedback.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first, Feedback::Announce("Example".into()));
        assert_eq!(second, Feedback::Error("Error: URL is empty".into()));
    }

    struct Blocking {
        release: Receiver<()>,
    }

    impl Launcher for Blocking {
        fn open_url(&self, _url: &str) -> io::Result<()> {
            let _ = self.release.recv();
            Ok(())
        }

        fn open_path(&self, _path: &Path) -> io::Result<()> {
            Ok(())
        }

        fn spawn_program(&self, _program: &ProgramLaunch) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn name_is_announced_while_the_handler_is_still_busy() {
        let (release_tx, release_rx) = unbounded();
        let (pool, feedback) = LaunchPool::new(1, Arc::new(Blocking { release: release_rx })).unwrap();

        pool.submit(WorkerMessage::launch(Item::new("Mail", ItemKind::Website, "mail.example.com")))
            .unwrap();

        let first = feedback.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first, Feedback::Announce("Mail".into()));
        assert!(feedback.recv_timeout(Duration::from_millis(50)).is_err());
        release_tx.send(()).unwrap();
    }

    #[test]
    fn submit_after_shutdown_fails() {
        let (mut pool, _feedback) = LaunchPool::new(1, Arc::new(Accepting)).unwrap();
        pool.shutdown();
        pool.shutdown();

        let item = Item::new("Example", ItemKind::Website, "example.com");
        assert!(matches!(pool.submit(WorkerMessage::launch(item)), Err(LauncherError::Worker(_))));
        assert!(!pool.is_running());
    }

    #[test]
    fn zero_workers_is_a_config_error() {
        assert!(matches!(LaunchPool::new(0, Arc::new(Accepting)), Err(LauncherError::Config(_))));
    }
}
