//! Blocking SQLite work runs here, never on the async runtime.
//!
//! A fixed set of worker threads each own one connection and take jobs from a
//! bounded queue. Callers submit a closure and await its reply.

use crate::db::migrate::run_pending_migrations;
use crate::db::queries::register_functions;
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

type Job = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct DbPool {
    path: PathBuf,
    sender: Option<mpsc::Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

/// Open a connection configured the way every worker expects it.
pub fn open_connection(path: &Path) -> AppResult<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    register_functions(&conn)?;
    Ok(conn)
}

impl DbPool {
    /// Migrate the database at `path` and start `workers` connection threads
    /// behind a queue holding at most `queue_capacity` pending jobs.
    pub fn open(path: impl AsRef<Path>, workers: usize, queue_capacity: usize) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();

        {
            let mut setup = open_connection(&path)?;
            run_pending_migrations(&mut setup)?;
        }

        let (sender, receiver) = mpsc::channel::<Job>(queue_capacity.max(1));
        let receiver = Arc::new(Mutex::new(receiver));

        let worker_count = workers.max(1);
        let mut handles = Vec::with_capacity(worker_count);
        for n in 0..worker_count {
            let conn = open_connection(&path)?;
            let receiver = Arc::clone(&receiver);
            let handle = thread::Builder::new()
                .name(format!("db-worker-{n}"))
                .spawn(move || worker_loop(conn, &receiver))?;
            handles.push(handle);
        }

        tracing::info!(
            path = %path.display(),
            workers = worker_count,
            queue_capacity = queue_capacity.max(1),
            "Database pool started"
        );

        Ok(Self {
            path,
            sender: Some(sender),
            workers: handles,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Run `func` on a worker connection and wait for its result.
    ///
    /// Waits for queue space when the queue is full. A worker panic while
    /// running `func` is reported as `PoolClosed`.
    pub async fn run<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or(AppError::PoolClosed)?;

        let (reply_tx, reply_rx) = oneshot::channel();
        let job: Job = Box::new(move |conn| {
            let _ = reply_tx.send(func(conn));
        });

        sender.send(job).await.map_err(|_| AppError::PoolClosed)?;
        reply_rx.await.map_err(|_| AppError::PoolClosed)?
    }

    /// Close the queue and wait for every worker to finish its current job.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if self.sender.take().is_none() {
            return;
        }

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::error!("Database worker terminated abnormally");
            }
        }

        tracing::info!(path = %self.path.display(), "Database pool stopped");
    }
}

impl Drop for DbPool {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop(mut conn: Connection, receiver: &Mutex<mpsc::Receiver<Job>>) {
    loop {
        // The lock is released before the job runs.
        let job = match receiver.lock() {
            Ok(mut rx) => rx.blocking_recv(),
            Err(_) => None,
        };

        let Some(job) = job else {
            break;
        };

        if panic::catch_unwind(AssertUnwindSafe(|| job(&mut conn))).is_err() {
            tracing::error!("Database job panicked; the caller receives PoolClosed");
        }
    }
}
