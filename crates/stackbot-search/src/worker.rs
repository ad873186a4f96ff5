use std::{
    sync::mpsc::{self, RecvError, SendError},
    thread::{self, JoinHandle},
};

use crate::{
    beam::{BeamConfig, BeamPlanner},
    protocol::{self, PlanRequest, PlanResponse},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("planning worker has shut down")]
pub struct WorkerClosed;

impl<T> From<SendError<T>> for WorkerClosed {
    fn from(_: SendError<T>) -> Self {
        WorkerClosed
    }
}

impl From<RecvError> for WorkerClosed {
    fn from(_: RecvError) -> Self {
        WorkerClosed
    }
}

/// Planning context running on its own thread.
///
/// Requests are answered one at a time in arrival order. The worker keeps no
/// state between requests.
#[derive(Debug)]
pub struct PlanningWorker {
    tx: Option<mpsc::Sender<PlanRequest>>,
    rx: mpsc::Receiver<PlanResponse>,
    handle: Option<JoinHandle<()>>,
}

impl PlanningWorker {
    #[must_use]
    pub fn start(config: BeamConfig) -> Self {
        let (tx_request, rx_request) = mpsc::channel();
        let (tx_response, rx_response) = mpsc::channel();
        let handle = thread::spawn(move || {
            planner_thread(&BeamPlanner::new(config), &rx_request, &tx_response);
        });
        Self {
            tx: Some(tx_request),
            rx: rx_response,
            handle: Some(handle),
        }
    }

    pub fn submit(&self, request: PlanRequest) -> Result<(), WorkerClosed> {
        let tx = self.tx.as_ref().ok_or(WorkerClosed)?;
        tx.send(request)?;
        Ok(())
    }

    /// Blocks until the next response arrives.
    pub fn recv(&self) -> Result<PlanResponse, WorkerClosed> {
        Ok(self.rx.recv()?)
    }

    /// Submits `request` and waits for its response.
    pub fn plan(&self, request: PlanRequest) -> Result<PlanResponse, WorkerClosed> {
        self.submit(request)?;
        self.recv()
    }

    /// Closes the request channel and waits for the thread to finish.
    pub fn shutdown(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::error!("planning thread panicked");
        }
    }
}

impl Drop for PlanningWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn planner_thread(
    planner: &BeamPlanner,
    rx: &mpsc::Receiver<PlanRequest>,
    tx: &mpsc::Sender<PlanResponse>,
) {
    while let Ok(request) = rx.recv() {
        let response = protocol::respond(planner, &request);
        if tx.send(response).is_err() {
            break;
        }
    }
    tracing::debug!("planning thread exiting");
}
