//! Fixed-size mesh worker pool.
//!
//! Jobs carry a snapshot of the chunk's voxels plus a generation tag; the
//! main sequence keeps mutating the live chunk freely while workers run.
//! Completed meshes travel back over a channel and are applied on the main
//! sequence only, where the generation check filters stale results.

use std::thread::JoinHandle;

use crossbeam_channel::{unbounded, Receiver, Sender};
use glam::IVec3;
use strata_core::{ChunkData, ChunkLod, MeshStats};
use strata_mesh::{mesh_chunk_with_options, MeshData, MeshError};
use tracing::{debug, trace};

pub(crate) struct MeshJob {
    pub chunk_pos: IVec3,
    pub slot: u32,
    pub generation: u64,
    pub lod: ChunkLod,
    pub voxel_size: f32,
    pub use_greedy: bool,
    pub snapshot: ChunkData,
}

pub(crate) struct MeshJobOutcome {
    pub chunk_pos: IVec3,
    pub slot: u32,
    pub generation: u64,
    pub result: Result<(MeshData, MeshStats), MeshError>,
}

fn run_job(job: MeshJob) -> MeshJobOutcome {
    let result = mesh_chunk_with_options(&job.snapshot, job.lod, job.voxel_size, job.use_greedy);
    MeshJobOutcome {
        chunk_pos: job.chunk_pos,
        slot: job.slot,
        generation: job.generation,
        result,
    }
}

pub(crate) struct MeshWorkerPool {
    job_tx: Option<Sender<MeshJob>>,
    outcome_tx: Sender<MeshJobOutcome>,
    outcome_rx: Receiver<MeshJobOutcome>,
    workers: Vec<JoinHandle<()>>,
}

impl MeshWorkerPool {
    /// Spawn `worker_count` threads. Zero workers is valid: jobs then run
    /// only through `run_sync`.
    pub fn new(worker_count: usize) -> Self {
        let (job_tx, job_rx) = unbounded::<MeshJob>();
        let (outcome_tx, outcome_rx) = unbounded::<MeshJobOutcome>();

        let workers = (0..worker_count)
            .map(|worker_id| {
                let job_rx = job_rx.clone();
                let outcome_tx = outcome_tx.clone();
                std::thread::Builder::new()
                    .name(format!("strata-mesh-{worker_id}"))
                    .spawn(move || {
                        while let Ok(job) = job_rx.recv() {
                            trace!(chunk_pos = ?job.chunk_pos, generation = job.generation, "meshing");
                            // The receiver only disappears during shutdown;
                            // the outcome is moot then.
                            let _ = outcome_tx.send(run_job(job));
                        }
                    })
                    .expect("spawn mesh worker thread")
            })
            .collect();

        Self {
            job_tx: Some(job_tx),
            outcome_tx,
            outcome_rx,
            workers,
        }
    }

    /// Hand a job to the worker threads.
    pub fn submit(&self, job: MeshJob) {
        if let Some(tx) = &self.job_tx {
            let _ = tx.send(job);
        }
    }

    /// Run a job immediately on the calling thread, feeding its outcome
    /// through the same completion channel so the drain path is uniform.
    pub fn run_sync(&self, job: MeshJob) {
        let _ = self.outcome_tx.send(run_job(job));
    }

    /// Non-blocking drain of completed jobs.
    pub fn drain(&self) -> Vec<MeshJobOutcome> {
        self.outcome_rx.try_iter().collect()
    }
}

impl Drop for MeshWorkerPool {
    fn drop(&mut self) {
        // Closing the job channel ends each worker's recv loop.
        self.job_tx.take();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                debug!("mesh worker panicked during shutdown");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use strata_core::{ChunkSize, Material};

    fn job_for(chunk: ChunkData, generation: u64) -> MeshJob {
        MeshJob {
            chunk_pos: chunk.chunk_pos(),
            slot: 0,
            generation,
            lod: ChunkLod::Lod0,
            voxel_size: 25.0,
            use_greedy: true,
            snapshot: chunk,
        }
    }

    fn solid_chunk() -> ChunkData {
        let mut chunk = ChunkData::new(IVec3::ZERO, ChunkSize::cube(8));
        chunk.fill_with(|_, _, _| Material::Stone);
        chunk
    }

    fn wait_for_outcomes(pool: &MeshWorkerPool, count: usize) -> Vec<MeshJobOutcome> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut outcomes = Vec::new();
        while outcomes.len() < count {
            assert!(Instant::now() < deadline, "timed out waiting for outcomes");
            outcomes.extend(pool.drain());
            std::thread::sleep(Duration::from_millis(1));
        }
        outcomes
    }

    #[test]
    fn test_async_job_completes() {
        let pool = MeshWorkerPool::new(2);
        pool.submit(job_for(solid_chunk(), 1));

        let outcomes = wait_for_outcomes(&pool, 1);
        let outcome = &outcomes[0];
        assert_eq!(outcome.generation, 1);
        let (mesh, _) = outcome.result.as_ref().expect("mesh");
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_sync_path_uses_same_channel() {
        let pool = MeshWorkerPool::new(0);
        pool.run_sync(job_for(solid_chunk(), 3));
        let outcomes = pool.drain();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].generation, 3);
    }

    #[test]
    fn test_many_jobs_all_complete() {
        let pool = MeshWorkerPool::new(4);
        for i in 0..16 {
            let mut chunk = ChunkData::new(IVec3::new(i, 0, 0), ChunkSize::cube(8));
            chunk.set(0, 0, 0, Material::Stone);
            pool.submit(job_for(chunk, i as u64));
        }
        let outcomes = wait_for_outcomes(&pool, 16);
        assert_eq!(outcomes.len(), 16);
    }

    #[test]
    fn test_shutdown_joins_workers() {
        let pool = MeshWorkerPool::new(2);
        pool.submit(job_for(solid_chunk(), 1));
        drop(pool);
    }
}
