//! Capture sequencing: countdown, shot, settle, repeat, finish.
//!
//! The sequencer owns one [`CaptureSession`] per run and drives it from a virtual-time
//! [`TimerQueue`]. Every pending delay belongs to exactly one run and is cancelled on restart,
//! failure, teardown, and drop.

use std::time::Duration;

use crate::capture::camera::{CameraSource, EncodedImage};
use crate::capture::timer::{RunId, TimerQueue};
use crate::catalog::filters::{CaptureFilter, DEFAULT_FILTER_KEY, filter_by_key};
use crate::catalog::templates::Template;
use crate::foundation::error::{BoothError, BoothResult};

/// Countdown length the user can pick before a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum CountdownSecs {
    /// Three seconds.
    #[default]
    Three,
    /// Five seconds.
    Five,
    /// Ten seconds.
    Ten,
}

impl CountdownSecs {
    /// Countdown length in seconds.
    pub fn secs(self) -> u32 {
        match self {
            Self::Three => 3,
            Self::Five => 5,
            Self::Ten => 10,
        }
    }
}

impl TryFrom<u32> for CountdownSecs {
    type Error = BoothError;

    fn try_from(secs: u32) -> BoothResult<Self> {
        match secs {
            3 => Ok(Self::Three),
            5 => Ok(Self::Five),
            10 => Ok(Self::Ten),
            other => Err(BoothError::validation(format!(
                "countdown must be 3, 5 or 10 seconds, got {other}"
            ))),
        }
    }
}

impl From<CountdownSecs> for u32 {
    fn from(c: CountdownSecs) -> u32 {
        c.secs()
    }
}

/// Fixed delays of the capture sequence, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptureTimings {
    /// Interval between countdown decrements.
    pub tick_ms: u64,
    /// How long the post-shot flash stays on.
    pub flash_ms: u64,
    /// Pause after a shot before the next countdown starts.
    pub settle_ms: u64,
    /// Pause after the last shot before the run completes.
    pub finish_ms: u64,
}

impl Default for CaptureTimings {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            flash_ms: 200,
            settle_ms: 1500,
            finish_ms: 1000,
        }
    }
}

/// Observable sequencer state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureState {
    /// No run in progress.
    Idle,
    /// Counting down to the next shot.
    Countdown {
        /// Seconds left on the display.
        remaining: u32,
    },
    /// A shot was taken; waiting before the next countdown.
    Settling,
    /// All shots taken; waiting before handing the photos over.
    Finishing,
}

/// What a finished run hands to the editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureOutcome {
    /// Raw stills in capture order.
    pub photos: Vec<EncodedImage>,
    /// Filter selected when the run finished.
    pub filter_key: String,
}

/// Transition reported by [`Sequencer::advance`].
#[derive(Debug)]
pub enum SequencerEvent {
    /// The countdown (re)started from the selected duration.
    CountdownStarted {
        /// Run that owns the countdown.
        run: RunId,
        /// Starting value.
        from: u32,
    },
    /// The countdown decremented.
    CountdownTick {
        /// Run that owns the countdown.
        run: RunId,
        /// Value after the decrement.
        remaining: u32,
    },
    /// A still was recorded.
    Captured {
        /// Run that took the shot.
        run: RunId,
        /// 0-based shot index.
        index: usize,
    },
    /// The post-shot flash ended.
    FlashEnded {
        /// Run that flashed.
        run: RunId,
    },
    /// The run finished and its continuation was invoked.
    Completed {
        /// Finished run.
        run: RunId,
        /// Number of stills handed over.
        shots: usize,
    },
    /// The run was aborted; the sequencer is idle and restartable.
    Failed {
        /// Aborted run.
        run: RunId,
        /// Why it was aborted.
        error: BoothError,
    },
}

/// One slot of the review strip next to the live feed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReviewSlot<'a> {
    /// A captured still, shown mirrored with the active filter.
    Captured(&'a EncodedImage),
    /// A shot still to be taken.
    Empty,
}

/// Countdown number and flash overlay over the live feed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Overlay {
    /// Countdown digit, shown only while above zero.
    pub countdown: Option<u32>,
    /// Full-frame white flash.
    pub flash: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CaptureTimer {
    Tick,
    FlashOff,
    Settle,
    Finish,
}

type Continuation = Box<dyn FnOnce(CaptureOutcome)>;

struct CaptureSession {
    id: RunId,
    shot_count: usize,
    photos: Vec<EncodedImage>,
    countdown: Option<u32>,
    state: CaptureState,
    flash: bool,
    on_complete: Option<Continuation>,
}

/// Drives timed multi-shot capture against a [`CameraSource`].
pub struct Sequencer<C: CameraSource> {
    camera: C,
    timings: CaptureTimings,
    countdown: CountdownSecs,
    filter: &'static CaptureFilter,
    timers: TimerQueue<CaptureTimer>,
    session: Option<CaptureSession>,
    next_run: u64,
}

impl<C: CameraSource> Sequencer<C> {
    /// Create an idle sequencer with the default countdown and filter.
    pub fn new(camera: C, timings: CaptureTimings) -> Self {
        let filter = filter_by_key(DEFAULT_FILTER_KEY).unwrap_or(&crate::catalog::filters::FILTERS[0]);
        Self {
            camera,
            timings,
            countdown: CountdownSecs::default(),
            filter,
            timers: TimerQueue::new(),
            session: None,
            next_run: 0,
        }
    }

    /// Borrow the camera.
    pub fn camera(&self) -> &C {
        &self.camera
    }

    /// Selected countdown duration.
    pub fn countdown(&self) -> CountdownSecs {
        self.countdown
    }

    /// Change the countdown duration. Only allowed while no run is active.
    pub fn set_countdown(&mut self, countdown: CountdownSecs) -> BoothResult<()> {
        if self.is_running() {
            return Err(BoothError::validation(
                "countdown can only be changed while idle",
            ));
        }
        self.countdown = countdown;
        Ok(())
    }

    /// Active filter.
    pub fn filter(&self) -> &'static CaptureFilter {
        self.filter
    }

    /// Select a filter by key. Allowed before a run and between shots.
    pub fn set_filter(&mut self, key: &str) -> BoothResult<()> {
        let filter = filter_by_key(key)
            .ok_or_else(|| BoothError::validation(format!("unknown filter '{key}'")))?;
        if !matches!(self.state(), CaptureState::Idle | CaptureState::Settling) {
            return Err(BoothError::validation(
                "filter can only be changed before a run or between shots",
            ));
        }
        self.filter = filter;
        Ok(())
    }

    /// Current state.
    pub fn state(&self) -> CaptureState {
        self.session
            .as_ref()
            .map_or(CaptureState::Idle, |s| s.state)
    }

    /// `true` while a run is in progress.
    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Stills captured so far in the active run.
    pub fn photos(&self) -> &[EncodedImage] {
        self.session.as_ref().map_or(&[], |s| s.photos.as_slice())
    }

    /// Countdown digit and flash state for the live-feed overlay.
    pub fn overlay(&self) -> Overlay {
        self.session.as_ref().map_or(Overlay::default(), |s| Overlay {
            countdown: s.countdown.filter(|&n| n > 0),
            flash: s.flash,
        })
    }

    /// Review strip for the active run: captured stills followed by empty placeholders.
    pub fn review_slots(&self) -> Vec<ReviewSlot<'_>> {
        let Some(s) = self.session.as_ref() else {
            return Vec::new();
        };
        let mut slots: Vec<ReviewSlot<'_>> = s.photos.iter().map(ReviewSlot::Captured).collect();
        slots.extend((s.photos.len()..s.shot_count).map(|_| ReviewSlot::Empty));
        slots
    }

    /// Number of timers still pending.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Time until the next scheduled transition, if any.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.timers.time_until_next()
    }

    /// Begin a run. Any run already in progress is superseded and its timers are cancelled.
    ///
    /// `on_complete` is invoked exactly once, when the run finishes successfully.
    #[tracing::instrument(skip(self, template, on_complete), fields(template = template.id))]
    pub fn start(
        &mut self,
        template: &Template,
        on_complete: impl FnOnce(CaptureOutcome) + 'static,
    ) -> BoothResult<RunId> {
        template.validate()?;
        self.discard_session("superseded by a new run");

        let id = RunId(self.next_run);
        self.next_run += 1;
        let from = self.countdown.secs();
        self.session = Some(CaptureSession {
            id,
            shot_count: template.shot_count as usize,
            photos: Vec::with_capacity(template.shot_count as usize),
            countdown: Some(from),
            state: CaptureState::Countdown { remaining: from },
            flash: false,
            on_complete: Some(Box::new(on_complete)),
        });
        self.timers
            .schedule(id, ms(self.timings.tick_ms), CaptureTimer::Tick);
        tracing::debug!(run = id.0, from, shots = template.shot_count, "capture run started");
        Ok(id)
    }

    /// Advance virtual time by `elapsed`, firing every timer that comes due, in order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<SequencerEvent> {
        let target = self.timers.now() + elapsed;
        let mut events = Vec::new();
        while let Some((run, timer)) = self.timers.pop_due(target) {
            self.fire(run, timer, &mut events);
        }
        self.timers.settle_at(target);
        events
    }

    /// Abandon any run and cancel every pending timer.
    pub fn teardown(&mut self) {
        self.discard_session("torn down");
        let leftover = self.timers.cancel_all();
        if leftover > 0 {
            tracing::debug!(leftover, "cancelled orphan capture timers");
        }
    }

    fn discard_session(&mut self, why: &str) {
        if let Some(old) = self.session.take() {
            let dropped = self.timers.cancel_run(old.id);
            tracing::debug!(run = old.id.0, dropped, why, "capture run discarded");
        }
    }

    fn fire(&mut self, run: RunId, timer: CaptureTimer, events: &mut Vec<SequencerEvent>) {
        let Some(session) = self.session.as_mut().filter(|s| s.id == run) else {
            tracing::debug!(run = run.0, ?timer, "dropping timer for inactive run");
            return;
        };

        match timer {
            CaptureTimer::Tick => {
                let remaining = session.countdown.unwrap_or(0).saturating_sub(1);
                session.countdown = Some(remaining);
                session.state = CaptureState::Countdown { remaining };
                events.push(SequencerEvent::CountdownTick { run, remaining });
                if remaining > 0 {
                    self.timers
                        .schedule(run, ms(self.timings.tick_ms), CaptureTimer::Tick);
                } else {
                    self.capture(run, events);
                }
            }
            CaptureTimer::FlashOff => {
                session.flash = false;
                events.push(SequencerEvent::FlashEnded { run });
            }
            CaptureTimer::Settle => {
                let from = self.countdown.secs();
                session.countdown = Some(from);
                session.state = CaptureState::Countdown { remaining: from };
                self.timers
                    .schedule(run, ms(self.timings.tick_ms), CaptureTimer::Tick);
                events.push(SequencerEvent::CountdownStarted { run, from });
            }
            CaptureTimer::Finish => self.finish(run, events),
        }
    }

    fn capture(&mut self, run: RunId, events: &mut Vec<SequencerEvent>) {
        let Some(still) = self.camera.snapshot().filter(|s| !s.is_empty()) else {
            let dropped = self.timers.cancel_run(run);
            self.session = None;
            tracing::warn!(run = run.0, dropped, "camera produced no image; run aborted");
            events.push(SequencerEvent::Failed {
                run,
                error: BoothError::capture("camera source produced no image"),
            });
            return;
        };

        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.photos.push(still);
        session.countdown = None;
        session.flash = true;
        let index = session.photos.len() - 1;
        self.timers
            .schedule(run, ms(self.timings.flash_ms), CaptureTimer::FlashOff);
        events.push(SequencerEvent::Captured { run, index });
        tracing::debug!(run = run.0, index, "still captured");

        if session.photos.len() < session.shot_count {
            session.state = CaptureState::Settling;
            self.timers
                .schedule(run, ms(self.timings.settle_ms), CaptureTimer::Settle);
        } else {
            session.state = CaptureState::Finishing;
            self.timers
                .schedule(run, ms(self.timings.finish_ms), CaptureTimer::Finish);
        }
    }

    fn finish(&mut self, run: RunId, events: &mut Vec<SequencerEvent>) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        let leftover = self.timers.cancel_run(run);
        let outcome = CaptureOutcome {
            photos: std::mem::take(&mut session.photos),
            filter_key: self.filter.key.to_string(),
        };
        let shots = outcome.photos.len();
        tracing::debug!(run = run.0, shots, leftover, filter = self.filter.key, "capture run complete");
        events.push(SequencerEvent::Completed { run, shots });
        if let Some(on_complete) = session.on_complete.take() {
            on_complete(outcome);
        }
    }
}

impl<C: CameraSource> Drop for Sequencer<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[cfg(test)]
#[path = "../../tests/unit/capture/sequencer.rs"]
mod tests;
