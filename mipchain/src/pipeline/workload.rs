//! Parallel compression of a single mip level.
//!
//! A [`CompressionWorkload`] binds a codec context, the level's image, a
//! swizzle and the level's output region. [`CompressionWorkload::run`] splits
//! the region into block rows, hands each worker the rows the codec assigns
//! to it, and joins every worker before returning.
//!
//! Workers report failures through an [`ErrorSlot`]. When several workers
//! fail, whichever error is stored last is the one returned; the slot only
//! guarantees that a failure is reported whenever at least one worker failed.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::trace;

use super::error::{PipelineError, PipelineResult};
use crate::codec::{BlockCodec, BlockRows, CodecContext, CodecError, Swizzle};
use crate::image::Image;

/// Failure flag plus the last error written by any worker.
#[derive(Debug, Default)]
pub struct ErrorSlot {
    failed: AtomicBool,
    error: Mutex<Option<CodecError>>,
}

impl ErrorSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `error`, replacing any earlier one. Called concurrently.
    pub fn record(&self, error: CodecError) {
        *self.error.lock() = Some(error);
        self.failed.store(true, Ordering::Release);
    }

    pub fn is_failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    pub fn into_result(self) -> Result<(), CodecError> {
        if !self.is_failed() {
            return Ok(());
        }
        Err(self.error.into_inner().unwrap_or_else(|| {
            CodecError::Failed("worker failed without a diagnostic".to_string())
        }))
    }
}

/// Fixed-size set of compression workers.
///
/// Built once per chain and reused for every level. With a single thread no
/// pool is created and work runs on the calling thread.
pub struct WorkerPool {
    threads: usize,
    pool: Option<ThreadPool>,
}

impl WorkerPool {
    pub fn new(threads: usize) -> PipelineResult<Self> {
        if threads == 0 {
            return Err(PipelineError::InvalidSetting(
                "thread count must be at least 1".to_string(),
            ));
        }

        let pool = if threads > 1 {
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|index| format!("mipchain-worker-{}", index))
                    .build()?,
            )
        } else {
            None
        };

        Ok(Self { threads, pool })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Run `work` once per job with the job's worker index and wait for all
    /// of them to finish.
    pub fn dispatch<T, F>(&self, jobs: Vec<T>, work: F)
    where
        T: Send,
        F: Fn(usize, T) + Sync,
    {
        match &self.pool {
            Some(pool) => pool.scope(|scope| {
                let work = &work;
                for (index, job) in jobs.into_iter().enumerate() {
                    scope.spawn(move |_| work(index, job));
                }
            }),
            None => {
                for (index, job) in jobs.into_iter().enumerate() {
                    work(index, job);
                }
            }
        }
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.threads)
            .field("inline", &self.pool.is_none())
            .finish()
    }
}

/// One level's compression job.
pub struct CompressionWorkload<'a, C: BlockCodec> {
    codec: &'a C,
    context: &'a CodecContext<C::Settings>,
    image: &'a Image,
    swizzle: Swizzle,
    output: &'a mut [u8],
    error: ErrorSlot,
}

impl<'a, C: BlockCodec> CompressionWorkload<'a, C> {
    pub fn new(
        codec: &'a C,
        context: &'a CodecContext<C::Settings>,
        image: &'a Image,
        swizzle: Swizzle,
        output: &'a mut [u8],
    ) -> Self {
        Self {
            codec,
            context,
            image,
            swizzle,
            output,
            error: ErrorSlot::new(),
        }
    }

    /// Bytes available in the output region.
    pub fn capacity(&self) -> usize {
        self.output.len()
    }

    /// Compress the level on every worker of `pool`.
    ///
    /// Every worker is invoked, including those the codec assigned no rows.
    pub fn run(self, pool: &WorkerPool) -> Result<(), CodecError> {
        let Self {
            codec,
            context,
            image,
            swizzle,
            output,
            error,
        } = self;

        let block = context.config().block;
        let (blocks_x, blocks_y, blocks_z) =
            block.blocks_for(image.width(), image.height(), image.depth());
        let row_bytes = blocks_x as usize * codec.block_bytes();
        let expected = row_bytes * blocks_y as usize * blocks_z as usize;
        if output.len() != expected {
            return Err(CodecError::BadOutputSize {
                expected,
                actual: output.len(),
            });
        }

        let workers = pool.threads();
        let mut assignments: Vec<BlockRows<'_>> =
            (0..workers).map(|_| BlockRows::default()).collect();
        if row_bytes > 0 {
            for (index, chunk) in output.chunks_exact_mut(row_bytes).enumerate() {
                let owner = codec.row_owner(index as u32, workers).min(workers - 1);
                assignments[owner].push(index as u32, chunk);
            }
        }

        pool.dispatch(assignments, |worker_index, mut rows| {
            trace!(worker = worker_index, rows = rows.len(), "Compressing block rows");
            if let Err(err) = codec.compress(context, image, &swizzle, &mut rows, worker_index) {
                error.record(err);
            }
        });

        error.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{BlockFootprint, CodecConfig, Quality};
    use std::thread::ThreadId;

    /// Writes each row index into its row and logs which worker did it.
    struct RowCodec {
        calls: Mutex<Vec<(usize, Vec<u32>, ThreadId)>>,
        fail_workers: Vec<usize>,
    }

    impl RowCodec {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_workers: Vec::new(),
            }
        }

        fn failing(workers: &[usize]) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_workers: workers.to_vec(),
            }
        }
    }

    impl BlockCodec for RowCodec {
        type Settings = ();

        fn name(&self) -> &str {
            "rows"
        }

        fn block_bytes(&self) -> usize {
            4
        }

        fn config_init(&self, config: CodecConfig) -> Result<CodecContext<()>, CodecError> {
            config.validate()?;
            Ok(CodecContext::new(config, ()))
        }

        fn compress(
            &self,
            context: &CodecContext<()>,
            _image: &Image,
            _swizzle: &Swizzle,
            rows: &mut BlockRows<'_>,
            worker_index: usize,
        ) -> Result<(), CodecError> {
            self.calls.lock().push((
                worker_index,
                rows.indices().collect(),
                std::thread::current().id(),
            ));
            if self.fail_workers.contains(&worker_index) {
                return Err(CodecError::Failed(format!("worker {}", worker_index)));
            }
            for row in rows.iter_mut() {
                row.data.fill(row.index as u8 + 1);
                context.record_blocks((row.data.len() / 4) as u64);
            }
            Ok(())
        }
    }

    fn image(width: u32, height: u32) -> Image {
        Image::from_rgba8(width, height, vec![0; (width * height * 4) as usize]).unwrap()
    }

    fn context(codec: &RowCodec) -> CodecContext<()> {
        codec
            .config_init(CodecConfig::new(BlockFootprint::FOUR_BY_FOUR, Quality::Fast))
            .unwrap()
    }

    #[test]
    fn test_error_slot_empty_is_ok() {
        assert!(ErrorSlot::new().into_result().is_ok());
    }

    #[test]
    fn test_error_slot_keeps_some_error() {
        let slot = ErrorSlot::new();
        std::thread::scope(|scope| {
            for worker in 0..8 {
                let slot = &slot;
                scope.spawn(move || {
                    if worker % 3 == 0 {
                        slot.record(CodecError::Failed(format!("worker {}", worker)));
                    }
                });
            }
        });

        assert!(slot.is_failed());
        match slot.into_result() {
            Err(CodecError::Failed(msg)) => {
                assert!(["worker 0", "worker 3", "worker 6"].contains(&msg.as_str()))
            }
            other => panic!("Expected a worker failure, got {:?}", other),
        }
    }

    #[test]
    fn test_pool_rejects_zero_threads() {
        assert!(matches!(
            WorkerPool::new(0),
            Err(PipelineError::InvalidSetting(_))
        ));
    }

    #[test]
    fn test_single_thread_runs_inline() {
        let pool = WorkerPool::new(1).unwrap();
        let caller = std::thread::current().id();
        let seen = Mutex::new(Vec::new());
        pool.dispatch(vec![(), ()], |index, _| {
            seen.lock().push((index, std::thread::current().id()));
        });

        let seen = seen.into_inner();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|(_, id)| *id == caller));
    }

    #[test]
    fn test_dispatch_runs_every_job_once() {
        let pool = WorkerPool::new(4).unwrap();
        let seen = Mutex::new(Vec::new());
        pool.dispatch((0..4).collect(), |index, job: usize| {
            assert_eq!(index, job);
            seen.lock().push(job);
        });

        let mut seen = seen.into_inner();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_workload_interleaves_rows() {
        let codec = RowCodec::new();
        let context = context(&codec);
        let image = image(8, 24);
        // 2 blocks × 4 bytes per row, 6 rows
        let mut output = vec![0u8; 48];

        let pool = WorkerPool::new(4).unwrap();
        CompressionWorkload::new(&codec, &context, &image, Swizzle::IDENTITY, &mut output)
            .run(&pool)
            .unwrap();

        for (row, chunk) in output.chunks(8).enumerate() {
            assert!(chunk.iter().all(|&b| b == row as u8 + 1));
        }
        assert_eq!(context.blocks_encoded(), 12);

        let mut calls = codec.calls.into_inner();
        calls.sort_by_key(|(worker, _, _)| *worker);
        let rows: Vec<_> = calls.into_iter().map(|(w, r, _)| (w, r)).collect();
        assert_eq!(
            rows,
            vec![(0, vec![0, 4]), (1, vec![1, 5]), (2, vec![2]), (3, vec![3])]
        );
    }

    #[test]
    fn test_workers_without_rows_are_invoked() {
        let codec = RowCodec::new();
        let context = context(&codec);
        let image = image(4, 4);
        let mut output = vec![0u8; 4];

        let pool = WorkerPool::new(8).unwrap();
        CompressionWorkload::new(&codec, &context, &image, Swizzle::IDENTITY, &mut output)
            .run(&pool)
            .unwrap();

        let calls = codec.calls.into_inner();
        assert_eq!(calls.len(), 8);
        assert_eq!(calls.iter().filter(|(_, rows, _)| rows.is_empty()).count(), 7);
    }

    #[test]
    fn test_single_failure_fails_workload() {
        let codec = RowCodec::failing(&[5]);
        let context = context(&codec);
        let image = image(16, 32);
        let mut output = vec![0u8; 4 * 4 * 8];

        let pool = WorkerPool::new(8).unwrap();
        let err = CompressionWorkload::new(&codec, &context, &image, Swizzle::IDENTITY, &mut output)
            .run(&pool)
            .unwrap_err();

        assert_eq!(err, CodecError::Failed("worker 5".to_string()));
        // Every other worker still ran to completion
        assert_eq!(codec.calls.lock().len(), 8);
    }

    #[test]
    fn test_output_size_mismatch() {
        let codec = RowCodec::new();
        let context = context(&codec);
        let image = image(8, 8);
        let mut output = vec![0u8; 15];

        let pool = WorkerPool::new(1).unwrap();
        let workload =
            CompressionWorkload::new(&codec, &context, &image, Swizzle::IDENTITY, &mut output);
        assert_eq!(workload.capacity(), 15);

        assert_eq!(
            workload.run(&pool).unwrap_err(),
            CodecError::BadOutputSize {
                expected: 16,
                actual: 15
            }
        );
        assert!(codec.calls.lock().is_empty());
    }
}
