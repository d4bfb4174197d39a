//! Core trait definitions for the exprshift ecosystem.
//!
//! These traits define the contracts that domain types implement across crates.

/// Genes processed between two consecutive [`Progress`] notifications.
pub const PROGRESS_BATCH: usize = 200;

/// Observer for long-running per-gene computations.
///
/// The estimators notify an observer every [`PROGRESS_BATCH`] genes and
/// once more at completion. Reporting is purely observational:
/// correctness never depends on an observer being attached, and the
/// no-op [`SilentProgress`] is the usual choice for headless runs.
pub trait Progress {
    /// Called after a batch of genes has been processed in `stage`.
    fn on_progress(&self, stage: &str, done: usize, total: usize);

    /// Per-gene hook that applies the batch policy before forwarding
    /// to [`on_progress`](Progress::on_progress).
    fn on_gene(&self, stage: &str, done: usize, total: usize) {
        if done % PROGRESS_BATCH == 0 || done == total {
            self.on_progress(stage, done, total);
        }
    }
}

/// No-op observer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl Progress for SilentProgress {
    fn on_progress(&self, _stage: &str, _done: usize, _total: usize) {}
}

/// A type that can produce a summary of its contents.
pub trait Summarizable {
    /// A one-line summary suitable for display.
    fn summary(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder(Mutex<Vec<usize>>);

    impl Progress for Recorder {
        fn on_progress(&self, _stage: &str, done: usize, _total: usize) {
            self.0.lock().unwrap().push(done);
        }
    }

    #[test]
    fn batches_every_200_and_at_completion() {
        let rec = Recorder(Mutex::new(Vec::new()));
        let total = 450;
        for done in 1..=total {
            rec.on_gene("means", done, total);
        }
        assert_eq!(*rec.0.lock().unwrap(), vec![200, 400, 450]);
    }

    #[test]
    fn completion_on_batch_boundary_fires_once() {
        let rec = Recorder(Mutex::new(Vec::new()));
        for done in 1..=200 {
            rec.on_gene("means", done, 200);
        }
        assert_eq!(*rec.0.lock().unwrap(), vec![200]);
    }
}
