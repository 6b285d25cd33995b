// THEORY:
// Frames share no state, so whole frames can be filtered concurrently. The
// `ParallelPipeline` is a producer/consumer layer around `run_frame`:
//
// 1.  **Dispatcher**: a single task pulls frame tasks off a bounded queue and
//     hands them to workers round-robin. The bound is the back-pressure point:
//     submitters wait once `queue_depth` frames are pending.
// 2.  **Workers**: each worker owns its own receiver and runs one frame at a
//     time. A frame's convolution state lives and dies inside one call, so no
//     frame is ever touched by two workers.
// 3.  **Replies**: every task carries a oneshot sender, so results come back to
//     the submitter that asked for them, tagged with a monotonically assigned
//     frame id.

use crate::core_modules::geometry::FrameGeometry;
use crate::error::{FrameError, Result};
use crate::pipeline::{PipelineConfig, run_frame};
use futures::future::join_all;
use image::RgbImage;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A filtered frame together with the id assigned at submission.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub frame_id: u64,
    pub frame: RgbImage,
}

struct FrameTask {
    frame_id: u64,
    frame: RgbImage,
    result_sender: oneshot::Sender<Result<RgbImage>>,
}

pub struct WorkerPool {
    task_sender: mpsc::Sender<FrameTask>,
    dispatcher: JoinHandle<()>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns the dispatcher and workers. Must be called inside a tokio runtime.
    pub fn new(config: &PipelineConfig) -> Self {
        let (task_sender, mut task_receiver) = mpsc::channel::<FrameTask>(config.queue_depth);

        let (worker_senders, worker_receivers): (Vec<_>, Vec<_>) = (0..config.worker_count)
            .map(|_| mpsc::channel::<FrameTask>(1))
            .unzip();

        let dispatcher = tokio::spawn(async move {
            let mut worker_idx = 0;
            while let Some(task) = task_receiver.recv().await {
                if worker_senders[worker_idx].send(task).await.is_err() {
                    warn!(worker = worker_idx, "worker stopped, dropping frame task");
                }
                worker_idx = (worker_idx + 1) % worker_senders.len();
            }
        });

        let geometry = config.geometry;
        let workers = worker_receivers
            .into_iter()
            .enumerate()
            .map(|(worker_idx, mut worker_receiver)| {
                tokio::spawn(async move {
                    while let Some(task) = worker_receiver.recv().await {
                        let FrameTask {
                            frame_id,
                            frame,
                            result_sender,
                        } = task;
                        let result = Self::process_frame_worker(geometry, frame).await;
                        debug!(worker = worker_idx, frame_id, ok = result.is_ok(), "frame filtered");
                        let _ = result_sender.send(result);
                    }
                })
            })
            .collect();

        info!(workers = config.worker_count, queue_depth = config.queue_depth, "edge worker pool started");
        Self {
            task_sender,
            dispatcher,
            workers,
        }
    }

    async fn process_frame_worker(geometry: FrameGeometry, frame: RgbImage) -> Result<RgbImage> {
        tokio::task::spawn_blocking(move || run_frame(&geometry, &frame))
            .await
            .map_err(|_| FrameError::WorkerUnavailable("frame task panicked"))?
    }

    async fn process_frame(&self, frame_id: u64, frame: RgbImage) -> Result<RgbImage> {
        let (result_sender, result_receiver) = oneshot::channel();

        let task = FrameTask {
            frame_id,
            frame,
            result_sender,
        };

        self.task_sender
            .send(task)
            .await
            .map_err(|_| FrameError::WorkerUnavailable("failed to send task to worker pool"))?;

        result_receiver
            .await
            .map_err(|_| FrameError::WorkerUnavailable("failed to receive result from worker"))?
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.dispatcher.abort();
        for worker in &self.workers {
            worker.abort();
        }
    }
}

/// Concurrent edge pipeline for independent frames.
pub struct ParallelPipeline {
    config: PipelineConfig,
    worker_pool: WorkerPool,
    frame_counter: AtomicU64,
}

impl ParallelPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let worker_pool = WorkerPool::new(&config);
        Ok(Self {
            config,
            worker_pool,
            frame_counter: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn worker_count(&self) -> usize {
        self.worker_pool.worker_count()
    }

    /// Filters one frame on the worker pool.
    pub async fn process_frame(&self, frame: RgbImage) -> Result<FrameOutput> {
        self.config.geometry.check_dimensions(frame.dimensions())?;
        let frame_id = self.frame_counter.fetch_add(1, Ordering::Relaxed);
        let frame = self.worker_pool.process_frame(frame_id, frame).await?;
        Ok(FrameOutput { frame_id, frame })
    }

    /// Filters a batch concurrently. Outputs come back in input order; the
    /// first failing frame fails the batch.
    pub async fn process_batch(&self, frames: Vec<RgbImage>) -> Result<Vec<FrameOutput>> {
        join_all(frames.into_iter().map(|frame| self.process_frame(frame)))
            .await
            .into_iter()
            .collect()
    }
}
