#![forbid(unsafe_code)]

//! Multi-stage timed process.
//!
//! A running test walks through named stages ("Preheating", "Heating", ...),
//! each with its own duration. [`StageFlow`] chains one [`Countdown`] per
//! stage: when the current stage completes the flow moves to the next, and
//! after the last stage it is finished for good. Ticks after that are no-ops,
//! like ticks after a single countdown completes.

use crate::countdown::{Countdown, CountdownSnapshot};
use crate::error::Result;

/// Text shown once every stage has run.
pub const DEFAULT_COMPLETION_TEXT: &str = "Experiment Complete";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Stage {
    name: String,
    countdown: Countdown,
}

/// Outcome of a single [`StageFlow::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageTick {
    /// The flow was already finished; nothing changed.
    Ignored,
    /// The current stage advanced by one second.
    Ticked,
    /// The current stage completed and the flow moved to stage `to`.
    Advanced {
        /// Index of the stage now running.
        to: usize,
    },
    /// The last stage completed.
    Finished,
}

/// Render state for a stage display.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StageSnapshot {
    /// Running stage, `None` once finished.
    pub stage_index: Option<usize>,
    /// Stage name, or the completion text once finished.
    pub stage_text: String,
    /// Countdown of the running stage.
    pub stage: Option<CountdownSnapshot>,
    /// Progress across all stages, `0..=100`.
    pub overall_percent: u8,
    /// Whether every stage has completed.
    pub finished: bool,
}

/// Ordered sequence of timed stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFlow {
    stages: Vec<Stage>,
    current: usize,
    completion_text: String,
}

impl StageFlow {
    /// Builds a flow from `(name, seconds)` pairs.
    ///
    /// An empty list yields a flow that is already finished.
    ///
    /// # Errors
    ///
    /// Returns [`KioskError::InvalidDuration`](crate::KioskError::InvalidDuration)
    /// for the first stage whose duration is not positive.
    pub fn new<N: Into<String>>(stages: impl IntoIterator<Item = (N, i64)>) -> Result<Self> {
        let stages = stages
            .into_iter()
            .map(|(name, seconds)| {
                Ok(Stage {
                    name: name.into(),
                    countdown: Countdown::new(seconds)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            stages,
            current: 0,
            completion_text: DEFAULT_COMPLETION_TEXT.to_string(),
        })
    }

    /// Overrides the text reported once finished.
    #[must_use]
    pub fn with_completion_text(mut self, text: impl Into<String>) -> Self {
        self.completion_text = text.into();
        self
    }

    /// Number of stages.
    #[inline]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the flow has no stages.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Index of the running stage, `None` once finished.
    pub fn stage_index(&self) -> Option<usize> {
        (self.current < self.stages.len()).then_some(self.current)
    }

    /// Countdown of the running stage.
    pub fn current_stage(&self) -> Option<&Countdown> {
        self.stages.get(self.current).map(|s| &s.countdown)
    }

    /// Name of the running stage, or the completion text once finished.
    pub fn stage_text(&self) -> &str {
        self.stages
            .get(self.current)
            .map_or(self.completion_text.as_str(), |s| s.name.as_str())
    }

    /// Whether every stage has completed.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.current >= self.stages.len()
    }

    /// Advances the running stage by one second.
    pub fn tick(&mut self) -> StageTick {
        let Some(stage) = self.stages.get_mut(self.current) else {
            return StageTick::Ignored;
        };
        stage.countdown.tick();
        if !stage.countdown.is_completed() {
            return StageTick::Ticked;
        }

        crate::debug!(stage = %stage.name, index = self.current, "stage completed");
        self.current += 1;
        if self.is_finished() {
            crate::info!(stages = self.stages.len(), "stage flow finished");
            StageTick::Finished
        } else {
            StageTick::Advanced { to: self.current }
        }
    }

    /// `floor(100 * elapsed / total)` across all stages.
    ///
    /// An empty flow reports 100.
    pub fn overall_percent(&self) -> u8 {
        let (elapsed, total) = self.stages.iter().fold((0u128, 0u128), |(e, t), s| {
            (
                e + u128::from(s.countdown.elapsed()),
                t + u128::from(s.countdown.total()),
            )
        });
        if total == 0 {
            return 100;
        }
        (elapsed * 100 / total).min(100) as u8
    }

    /// Captures the current render state.
    pub fn snapshot(&self) -> StageSnapshot {
        StageSnapshot {
            stage_index: self.stage_index(),
            stage_text: self.stage_text().to_string(),
            stage: self.current_stage().map(Countdown::snapshot),
            overall_percent: self.overall_percent(),
            finished: self.is_finished(),
        }
    }
}
