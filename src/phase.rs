//! Top-level screen switch: template selection, capture, edit.

use crate::capture::sequencer::CaptureOutcome;
use crate::catalog::templates::{Template, template_by_id};
use crate::foundation::error::{BoothError, BoothResult};

/// Which screen is active and the data handed forward to it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Picking a layout.
    #[default]
    Template,
    /// Running the capture sequencer for `template`.
    Capture {
        /// Chosen layout.
        template: &'static Template,
    },
    /// Composing the captured photos.
    Edit {
        /// Chosen layout.
        template: &'static Template,
        /// Photos and filter from the finished capture run.
        outcome: CaptureOutcome,
    },
}

impl Phase {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::Capture { .. } => "capture",
            Self::Edit { .. } => "edit",
        }
    }
}

/// Owns the current [`Phase`] and enforces its forward-only transitions.
#[derive(Debug, Default)]
pub struct PhaseController {
    phase: Phase,
}

impl PhaseController {
    /// Start at template selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Pick a layout by id and move to capture. Only valid from template selection.
    pub fn select_template(&mut self, id: &str) -> BoothResult<&'static Template> {
        if !matches!(self.phase, Phase::Template) {
            return Err(self.bad_transition("select_template"));
        }
        let template = template_by_id(id)
            .ok_or_else(|| BoothError::validation(format!("unknown template '{id}'")))?;
        self.set(Phase::Capture { template });
        Ok(template)
    }

    /// Hand a finished capture run to the editor.
    pub fn complete_capture(&mut self, outcome: CaptureOutcome) -> BoothResult<()> {
        let Phase::Capture { template } = self.phase else {
            return Err(self.bad_transition("complete_capture"));
        };
        self.set(Phase::Edit { template, outcome });
        Ok(())
    }

    /// Drop any photos and go back to template selection. Valid from every phase.
    pub fn restart(&mut self) {
        self.set(Phase::Template);
    }

    fn set(&mut self, next: Phase) {
        tracing::debug!(from = self.phase.name(), to = next.name(), "phase change");
        self.phase = next;
    }

    fn bad_transition(&self, op: &str) -> BoothError {
        BoothError::validation(format!("{op} is not valid in the {} phase", self.phase.name()))
    }
}

#[cfg(test)]
#[path = "../tests/unit/phase.rs"]
mod tests;
