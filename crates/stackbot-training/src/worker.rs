use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc,
    },
    thread::{self, JoinHandle},
};

use stackbot_evaluator::weights::WeightVector;

use crate::trainer::{ProgressEvent, Trainer, TrainerConfig, TrainerConfigError, TrainingSummary};

/// Training context running a [`Trainer`] on its own thread.
///
/// Progress events are fire-and-forget: they are queued on a channel and
/// dropped silently once the receiver is gone.
#[derive(Debug)]
pub struct TrainingWorker {
    active: Arc<AtomicBool>,
    events: mpsc::Receiver<ProgressEvent>,
    handle: Option<JoinHandle<TrainingSummary>>,
}

impl TrainingWorker {
    /// Validates `config` and starts training from `seed`.
    pub fn start(
        config: TrainerConfig,
        seed: Option<WeightVector>,
    ) -> Result<Self, TrainerConfigError> {
        let mut trainer = Trainer::new(config, seed)?;
        let active = Arc::new(AtomicBool::new(true));
        let (tx, rx) = mpsc::channel();
        let handle = {
            let active = Arc::clone(&active);
            thread::spawn(move || {
                let summary = trainer.run(&active, |event| {
                    let _ = tx.send(event.clone());
                });
                active.store(false, Ordering::Release);
                tracing::debug!(iterations = summary.iterations, "training thread exiting");
                summary
            })
        };
        Ok(Self {
            active,
            events: rx,
            handle: Some(handle),
        })
    }

    /// Progress events emitted so far.
    #[must_use]
    pub fn events(&self) -> &mpsc::Receiver<ProgressEvent> {
        &self.events
    }

    /// Whether the trainer is still iterating.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Requests a cooperative stop and waits for the current candidate to finish.
    ///
    /// Returns `None` if the worker was already stopped or the thread panicked.
    pub fn stop(&mut self) -> Option<TrainingSummary> {
        self.active.store(false, Ordering::Release);
        self.join()
    }

    /// Waits for the run to end on its own (iteration budget exhausted).
    pub fn join(&mut self) -> Option<TrainingSummary> {
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(summary) => Some(summary),
            Err(_) => {
                tracing::error!("training thread panicked");
                None
            }
        }
    }
}

impl Drop for TrainingWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
