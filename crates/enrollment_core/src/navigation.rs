//! Step visibility and the position within the visible steps.

use shared::domain::StepId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    current_step_index: usize,
    visible_steps: Vec<StepId>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            current_step_index: 0,
            visible_steps: vec![StepId::Student],
        }
    }
}

/// Which optional steps are switched on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepFlags {
    pub mother: bool,
    pub father: bool,
    /// Whether the form declares a guardian step at all.
    pub guardian_present: bool,
}

pub fn visible_steps(flags: StepFlags) -> Vec<StepId> {
    let mut steps = vec![StepId::Student];
    if flags.mother {
        steps.push(StepId::Mother);
    }
    if flags.father {
        steps.push(StepId::Father);
    }
    if flags.guardian_present {
        steps.push(StepId::Guardian);
    }
    steps
}

impl FormState {
    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn visible_steps(&self) -> &[StepId] {
        &self.visible_steps
    }

    pub fn current_step(&self) -> StepId {
        self.visible_steps[self.current_step_index]
    }

    pub fn is_first(&self) -> bool {
        self.current_step_index == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_step_index + 1 == self.visible_steps.len()
    }

    /// Rebuilds the visible list from scratch and clamps the index into it.
    pub fn recompute(&mut self, flags: StepFlags) {
        self.visible_steps = visible_steps(flags);
        if self.current_step_index >= self.visible_steps.len() {
            self.current_step_index = self.visible_steps.len() - 1;
        }
    }

    /// Moves forward one step. Callers gate this on step validation.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current_step_index += 1;
        true
    }

    pub fn retreat(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current_step_index -= 1;
        true
    }

    pub fn progress_percent(&self) -> f64 {
        (self.current_step_index + 1) as f64 / self.visible_steps.len() as f64 * 100.0
    }

    pub fn render(&self) -> StepView {
        StepView {
            active_step: self.current_step(),
            description: self.current_step().description(),
            progress_percent: self.progress_percent(),
            prev_visible: !self.is_first(),
            next_visible: !self.is_last(),
            submit_visible: self.is_last(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepView {
    pub active_step: StepId,
    pub description: &'static str,
    pub progress_percent: f64,
    pub prev_visible: bool,
    pub next_visible: bool,
    pub submit_visible: bool,
}
