//! Background jobs polled from the GUI thread.

use anyhow::{anyhow, Result};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tokio::runtime::Builder;

/// Handle to a background task; poll it once per frame.
pub struct AsyncJob<T> {
    receiver: Option<Receiver<Result<T>>>,
}

impl<T> AsyncJob<T> {
    pub fn new(receiver: Receiver<Result<T>>) -> Self {
        Self {
            receiver: Some(receiver),
        }
    }

    /// Returns Some(result) once the job has completed, None while it is still running
    pub fn poll(&mut self) -> Option<Result<T>> {
        if let Some(rx) = &self.receiver {
            match rx.try_recv() {
                Ok(res) => {
                    self.receiver = None;
                    return Some(res);
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.receiver = None;
                    return Some(Err(anyhow!("Worker task disconnected")));
                }
            }
        }
        None
    }

    pub fn is_running(&self) -> bool {
        self.receiver.is_some()
    }
}

/// Run `builder()` on its own thread inside a current-thread tokio runtime.
pub fn spawn_job<T, FutBuilder, Fut>(builder: FutBuilder) -> AsyncJob<T>
where
    T: Send + 'static,
    FutBuilder: FnOnce() -> Fut + Send + 'static,
    Fut: std::future::Future<Output = Result<T>> + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = match Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime.block_on(builder()),
            Err(e) => Err(anyhow!("Failed to create async runtime: {}", e)),
        };
        let _ = tx.send(result);
    });
    AsyncJob::new(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait<T>(job: &mut AsyncJob<T>) -> Result<T> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(res) = job.poll() {
                return res;
            }
            assert!(Instant::now() < deadline, "job did not finish");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_spawn_job_returns_value() {
        let mut job = spawn_job(|| async { Ok(41 + 1) });
        assert_eq!(wait(&mut job).unwrap(), 42);
        assert!(!job.is_running());
        assert!(job.poll().is_none());
    }

    #[test]
    fn test_spawn_job_runs_tokio_timers() {
        let mut job = spawn_job(|| async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok("done")
        });
        assert_eq!(wait(&mut job).unwrap(), "done");
    }

    #[test]
    fn test_spawn_job_propagates_error() {
        let mut job: AsyncJob<()> = spawn_job(|| async { Err(anyhow!("node unreachable")) });
        assert_eq!(wait(&mut job).unwrap_err().to_string(), "node unreachable");
    }

    #[test]
    fn test_dropped_sender_reports_disconnect() {
        let (tx, rx) = mpsc::channel::<Result<u8>>();
        drop(tx);
        let mut job = AsyncJob::new(rx);
        assert!(job.is_running());
        let err = job.poll().unwrap().unwrap_err();
        assert!(err.to_string().contains("disconnected"));
        assert!(!job.is_running());
    }
}
