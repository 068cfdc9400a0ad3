use super::session::FilterJob;
use super::{PendingFilterTask, TintlabApp};
use egui::Context;
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::Instant;

impl TintlabApp {
    /// Run `job` on a worker thread; the result arrives via `poll_filter_worker`.
    pub(crate) fn start_filter_job(&mut self, job: FilterJob) {
        let transformer = self.transformer;
        let FilterJob {
            source,
            kind,
            generation,
        } = job;
        log::info!(
            "Applying {} in background to {} px",
            kind.id(),
            source.pixel_count()
        );
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(transformer.transform(&source, kind));
        });
        self.pending_filter_task = Some(PendingFilterTask {
            rx,
            generation,
            kind,
            started: Instant::now(),
        });
        self.set_status(format!("Applying {}…", kind.label()));
    }

    pub(crate) fn poll_filter_worker(&mut self, ctx: &Context) {
        let Some(task) = self.pending_filter_task.take() else {
            return;
        };
        match task.rx.try_recv() {
            Ok(output) => {
                if !self.session.is_current(task.generation) {
                    log::debug!(
                        "Discarded stale {} result (generation {})",
                        task.kind.id(),
                        task.generation
                    );
                    return;
                }
                log::info!(
                    "Applied {} in background in {:.1?}",
                    task.kind.id(),
                    task.started.elapsed()
                );
                self.finish_filter(ctx, task.kind, output);
            }
            Err(TryRecvError::Empty) => {
                self.pending_filter_task = Some(task);
            }
            Err(TryRecvError::Disconnected) => {
                log::warn!("Filter worker for {} disconnected", task.kind.id());
                self.set_status(format!(
                    "Applying {} failed: worker disconnected.",
                    task.kind.label()
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::image::{Bitmap, FilterKind, PackedColor};
    use std::time::Duration;

    fn recv_within(task: &PendingFilterTask) -> Bitmap {
        task.rx
            .recv_timeout(Duration::from_secs(10))
            .expect("worker result")
    }

    #[test]
    fn stale_result_is_discarded() {
        let ctx = Context::default();
        let mut app = TintlabApp::with_config(AppConfig::default());
        app.set_source_bitmap(&ctx, Bitmap::filled(2, 2, PackedColor::BLACK), None);

        let job = app.session.request(FilterKind::Invert).expect("source loaded");
        app.start_filter_job(job);
        // A newer selection bumps the generation while the worker runs.
        let _newer = app.session.request(FilterKind::Sepia).expect("source loaded");

        let task = app.pending_filter_task.take().expect("task started");
        let output = recv_within(&task);
        let (tx, rx) = mpsc::channel();
        tx.send(output).expect("send");
        app.pending_filter_task = Some(PendingFilterTask { rx, ..task });
        app.poll_filter_worker(&ctx);

        assert!(app.pending_filter_task.is_none());
        assert_eq!(
            app.display.as_ref().map(|d| d.bitmap().clone()),
            Some(Bitmap::filled(2, 2, PackedColor::BLACK))
        );
    }

    #[test]
    fn disconnected_worker_is_reported() {
        let ctx = Context::default();
        let mut app = TintlabApp::with_config(AppConfig::default());
        let (tx, rx) = mpsc::channel::<Bitmap>();
        drop(tx);
        app.pending_filter_task = Some(PendingFilterTask {
            rx,
            generation: 0,
            kind: FilterKind::Sepia,
            started: Instant::now(),
        });
        app.poll_filter_worker(&ctx);
        assert!(app.pending_filter_task.is_none());
        assert_eq!(
            app.last_status.as_deref(),
            Some("Applying Sepia failed: worker disconnected.")
        );
    }
}
