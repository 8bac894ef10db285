//! Parallel render scheduler.
//!
//! A render moves through `Idle → Sized → Dispatched → Merged → Done`:
//!
//! - **Sized**: the output length and worker count are fixed from the
//!   timeline, the hardware and the memory budget.
//! - **Dispatched**: worker `w` renders notes `w, w + n, w + 2n, ...` into its
//!   own zeroed buffer. Workers share nothing mutable.
//! - **Merged**: worker buffers are summed in worker-index order, so the
//!   result does not depend on thread timing.
//! - **Done**: master gain, DC blocking and soft limiting are applied.
//!
//! Any worker failure fails the whole render; partial buffers are dropped.

use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use crate::math::TickClock;
use crate::note::Note;
use crate::oscillator::SynthState;
use crate::shaping::finalize_mix;
use crate::timing::{self, TimingLookup};
use crate::voice::NoteVoice;
use rayon::prelude::*;
use std::any::Any;
use std::num::NonZeroUsize;
use std::ops::Deref;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use tracing::{debug, debug_span, trace};

/// Longest output a single render may produce.
pub const MAX_RENDER_SECONDS: usize = 3600;

/// Lifecycle of a single render invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Idle,
    Sized,
    Dispatched,
    Merged,
    Done,
}

impl RenderPhase {
    /// The phase that follows this one, or `None` once done.
    pub fn next(self) -> Option<Self> {
        match self {
            RenderPhase::Idle => Some(RenderPhase::Sized),
            RenderPhase::Sized => Some(RenderPhase::Dispatched),
            RenderPhase::Dispatched => Some(RenderPhase::Merged),
            RenderPhase::Merged => Some(RenderPhase::Done),
            RenderPhase::Done => None,
        }
    }
}

/// Sizing decisions for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPlan {
    /// Output length in frames
    pub total_frames: usize,
    /// Number of logical workers
    pub worker_count: usize,
    /// Tick-to-frame conversion in effect
    pub clock: TickClock,
}

impl RenderPlan {
    /// Size a render. The result depends only on the timeline, the tempo,
    /// the sample rate and the worker limits.
    pub fn new(notes: &[Note], config: &RenderConfig) -> Self {
        let clock = config.clock();
        let total_frames = Self::total_frames(notes, &clock);
        let worker_count = Self::worker_count(
            notes.len(),
            total_frames,
            config.max_workers,
            config.memory_budget_bytes,
        );
        Self {
            total_frames,
            worker_count,
            clock,
        }
    }

    /// Maximum `start_frame + frame_count` over all non-empty notes.
    pub fn total_frames(notes: &[Note], clock: &TickClock) -> usize {
        notes
            .iter()
            .filter_map(|note| {
                let frames = clock.frame_of(note.duration_tick);
                (frames > 0).then(|| clock.frame_of(note.start_tick).saturating_add(frames))
            })
            .max()
            .unwrap_or(0)
    }

    /// `clamp(requested, 1, min(note_count, budget / (total_frames * 4)))`.
    ///
    /// `max_workers == 0` requests the hardware concurrency. An empty
    /// timeline always gets one worker.
    pub fn worker_count(
        note_count: usize,
        total_frames: usize,
        max_workers: usize,
        memory_budget_bytes: usize,
    ) -> usize {
        if note_count == 0 {
            return 1;
        }

        let requested = if max_workers == 0 {
            hardware_concurrency()
        } else {
            max_workers
        };

        let bytes_per_worker = total_frames
            .max(1)
            .saturating_mul(std::mem::size_of::<f32>());
        let memory_limited = (memory_budget_bytes / bytes_per_worker).max(1);

        requested.clamp(1, note_count.min(memory_limited))
    }
}

/// Number of threads the hardware can run in parallel.
pub fn hardware_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Mono output samples, index 0 = first frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderBuffer(Vec<f32>);

impl RenderBuffer {
    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.0.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
    }
}

impl Deref for RenderBuffer {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

impl From<Vec<f32>> for RenderBuffer {
    fn from(samples: Vec<f32>) -> Self {
        Self(samples)
    }
}

/// Result of a render operation.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// Rendered samples in [-1.0, 1.0]
    pub buffer: RenderBuffer,
    /// Sample rate of the buffer
    pub sample_rate: u32,
    /// Number of workers used
    pub worker_count: usize,
    /// Wall-clock render time
    pub elapsed: Duration,
    /// Peak level (linear)
    pub peak_level: f32,
    /// Last phase reached; `Idle` or `Sized` when there was nothing to render
    pub phase: RenderPhase,
}

impl RenderResult {
    fn empty(sample_rate: u32, started: Instant, phase: RenderPhase) -> Self {
        Self {
            buffer: RenderBuffer::default(),
            sample_rate,
            worker_count: 1,
            elapsed: started.elapsed(),
            peak_level: 0.0,
            phase,
        }
    }

    /// Number of frames rendered.
    pub fn length_samples(&self) -> usize {
        self.buffer.len()
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.buffer.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Offline singing-voice renderer.
///
/// Holds a validated configuration; one render runs at a time per call and
/// renders never share state.
#[derive(Debug, Clone)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a renderer, rejecting out-of-range configuration up front.
    pub fn new(config: RenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render a note timeline.
    ///
    /// Deterministic for identical inputs regardless of worker count;
    /// only [`RenderResult::elapsed`] varies.
    pub fn render<T>(&self, notes: &[Note], timing: &T) -> Result<RenderResult>
    where
        T: TimingLookup + ?Sized,
    {
        let started = Instant::now();
        let config = &self.config;
        let span = debug_span!("render", notes = notes.len(), sample_rate = config.sample_rate);
        let _enter = span.enter();

        let mut phase = RenderPhase::Idle;
        if notes.is_empty() || config.is_degenerate() {
            debug!("degenerate input, returning empty buffer");
            return Ok(RenderResult::empty(config.sample_rate, started, phase));
        }

        let plan = RenderPlan::new(notes, config);
        advance(&mut phase);
        debug!(
            total_frames = plan.total_frames,
            workers = plan.worker_count,
            "render sized"
        );
        let max_frames = max_render_frames(config.sample_rate);
        if plan.total_frames > max_frames {
            return Err(RenderError::TooLong {
                frames: plan.total_frames,
                max_frames,
            });
        }
        if plan.total_frames == 0 {
            return Ok(RenderResult::empty(config.sample_rate, started, phase));
        }

        advance(&mut phase);
        let worker_buffers = dispatch(&plan, notes, timing)?;

        advance(&mut phase);
        let mut mixed = merge(worker_buffers, plan.total_frames);

        finalize_mix(&mut mixed, config.master_gain);
        advance(&mut phase);

        let buffer = RenderBuffer::from(mixed);
        let peak_level = buffer.peak();
        let elapsed = started.elapsed();
        debug!(?elapsed, peak_level, "render done");

        Ok(RenderResult {
            buffer,
            sample_rate: config.sample_rate,
            worker_count: plan.worker_count,
            elapsed,
            peak_level,
            phase,
        })
    }
}

/// Render `notes` with `timing` under `config`.
///
/// Convenience wrapper around [`Renderer`].
pub fn render<T>(notes: &[Note], timing: &T, config: &RenderConfig) -> Result<RenderResult>
where
    T: TimingLookup + ?Sized,
{
    Renderer::new(config.clone())?.render(notes, timing)
}

fn advance(phase: &mut RenderPhase) {
    if let Some(next) = phase.next() {
        trace!(from = ?*phase, to = ?next, "render phase");
        *phase = next;
    }
}

/// Frame limit at `sample_rate`, kept within what one `Vec<f32>` can hold.
pub fn max_render_frames(sample_rate: u32) -> usize {
    let by_duration = (sample_rate as usize).saturating_mul(MAX_RENDER_SECONDS);
    by_duration.min(isize::MAX as usize / std::mem::size_of::<f32>())
}

/// Run every worker and collect their buffers in worker-index order.
fn dispatch<T>(plan: &RenderPlan, notes: &[Note], timing: &T) -> Result<Vec<Vec<f32>>>
where
    T: TimingLookup + ?Sized,
{
    let worker_count = plan.worker_count;
    if worker_count == 1 {
        return render_worker(0, plan, notes, timing).map(|buffer| vec![buffer]);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_count)
        .thread_name(|i| format!("uta-render-{i}"))
        .build()
        .map_err(|e| RenderError::ThreadPool(e.to_string()))?;

    pool.install(|| {
        (0..worker_count)
            .into_par_iter()
            .map(|worker| render_worker(worker, plan, notes, timing))
            .collect()
    })
}

/// Render every note assigned to `worker` into a private buffer.
fn render_worker<T>(worker: usize, plan: &RenderPlan, notes: &[Note], timing: &T) -> Result<Vec<f32>>
where
    T: TimingLookup + ?Sized,
{
    let mut buffer = vec![0.0f32; plan.total_frames];
    let mut state = SynthState::for_note(worker);
    let mut rendered = 0usize;

    for index in (worker..notes.len()).step_by(plan.worker_count) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let entry = timing::resolve(timing, &notes[index].lyric);
            match NoteVoice::prepare(notes, index, entry, &plan.clock, plan.total_frames) {
                Some(voice) => {
                    state.reset(index);
                    voice.render_into(&mut state, &mut buffer).map(|_| true)
                }
                None => Ok(false),
            }
        }));

        match outcome {
            Ok(Ok(true)) => rendered += 1,
            Ok(Ok(false)) => {}
            Ok(Err(err)) => return Err(err),
            Err(payload) => {
                return Err(RenderError::WorkerPanicked {
                    worker,
                    note_index: Some(index),
                    message: panic_message(payload.as_ref()),
                })
            }
        }
    }

    trace!(worker, rendered, "worker finished");
    Ok(buffer)
}

/// Sum worker buffers in index order.
fn merge(worker_buffers: Vec<Vec<f32>>, total_frames: usize) -> Vec<f32> {
    let mut buffers = worker_buffers.into_iter();
    let mut mixed = buffers.next().unwrap_or_else(|| vec![0.0; total_frames]);
    for local in buffers {
        for (out, sample) in mixed.iter_mut().zip(&local) {
            *out += sample;
        }
    }
    mixed
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
