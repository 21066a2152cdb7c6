//! Operator-driven position within a phased procedure.

use crate::procedure::StepId;

/// A `(phase, step)` position bounded by a per-phase step count.
///
/// Moves past either end are no-ops. Both indices are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureCursor {
    shape: Vec<usize>,
    phase: usize,
    step: usize,
}

impl ProcedureCursor {
    /// Creates a cursor at step 1.1.
    ///
    /// Returns `None` if `shape` is empty or contains an empty phase.
    #[must_use]
    pub fn new(shape: Vec<usize>) -> Option<Self> {
        if shape.is_empty() || shape.contains(&0) {
            return None;
        }
        Some(Self::starting(shape))
    }

    /// Cursor at step 1.1 over a shape already known to be non-degenerate.
    pub(crate) const fn starting(shape: Vec<usize>) -> Self {
        Self {
            shape,
            phase: 1,
            step: 1,
        }
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> StepId {
        StepId::new(self.phase, self.step)
    }

    /// Moves to the next step, rolling into the next phase.
    ///
    /// Returns `false` (and stays put) at the last step of the last phase.
    pub fn advance(&mut self) -> bool {
        if self.step < self.phase_len(self.phase) {
            self.step += 1;
            true
        } else if self.phase < self.shape.len() {
            self.phase += 1;
            self.step = 1;
            true
        } else {
            false
        }
    }

    /// Moves to the previous step, rolling back to the end of the previous
    /// phase.
    ///
    /// Returns `false` (and stays put) at step 1.1.
    pub fn retreat(&mut self) -> bool {
        if self.step > 1 {
            self.step -= 1;
            true
        } else if self.phase > 1 {
            self.phase -= 1;
            self.step = self.phase_len(self.phase);
            true
        } else {
            false
        }
    }

    /// Steps of fully passed phases plus the current step index.
    #[must_use]
    pub fn completed_substeps(&self) -> usize {
        self.shape[..self.phase - 1].iter().sum::<usize>() + self.step
    }

    /// Total steps across all phases.
    #[must_use]
    pub fn total_substeps(&self) -> usize {
        self.shape.iter().sum()
    }

    /// `round(100 × completed / total)`, half rounding up.
    #[must_use]
    pub fn progress(&self) -> u8 {
        let completed = self.completed_substeps();
        let total = self.total_substeps();
        let percent = (200 * completed + total) / (2 * total);
        u8::try_from(percent).unwrap_or(100)
    }

    /// Returns whether the cursor is at step 1.1.
    #[must_use]
    pub const fn at_start(&self) -> bool {
        self.phase == 1 && self.step == 1
    }

    /// Returns whether the cursor is at the last step of the last phase.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.phase == self.shape.len() && self.step == self.phase_len(self.phase)
    }

    fn phase_len(&self, phase: usize) -> usize {
        self.shape.get(phase - 1).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingress_cursor() -> ProcedureCursor {
        ProcedureCursor::new(vec![3, 3, 4, 2]).unwrap()
    }

    #[test]
    fn rejects_degenerate_shapes() {
        assert!(ProcedureCursor::new(vec![]).is_none());
        assert!(ProcedureCursor::new(vec![2, 0, 1]).is_none());
    }

    #[test]
    fn advance_rolls_into_next_phase() {
        let mut cursor = ingress_cursor();
        assert!(cursor.advance());
        assert!(cursor.advance());
        assert_eq!(cursor.position(), StepId::new(1, 3));
        assert!(cursor.advance());
        assert_eq!(cursor.position(), StepId::new(2, 1));
    }

    #[test]
    fn retreat_rolls_back_to_previous_phase_end() {
        let mut cursor = ingress_cursor();
        for _ in 0..6 {
            cursor.advance();
        }
        assert_eq!(cursor.position(), StepId::new(3, 1));
        assert!(cursor.retreat());
        assert_eq!(cursor.position(), StepId::new(2, 3));
    }

    #[test]
    fn retreat_at_start_is_noop() {
        let mut cursor = ingress_cursor();
        assert!(cursor.at_start());
        assert!(!cursor.retreat());
        assert_eq!(cursor.position(), StepId::new(1, 1));
    }

    #[test]
    fn advance_at_end_is_noop() {
        let mut cursor = ingress_cursor();
        while cursor.advance() {}
        assert!(cursor.at_end());
        assert_eq!(cursor.position(), StepId::new(4, 2));
        assert!(!cursor.advance());
        assert_eq!(cursor.position(), StepId::new(4, 2));
    }

    #[test]
    fn progress_at_phase_3_step_2_is_67() {
        let mut cursor = ingress_cursor();
        while cursor.position() != StepId::new(3, 2) {
            assert!(cursor.advance());
        }
        assert_eq!(cursor.completed_substeps(), 8);
        assert_eq!(cursor.total_substeps(), 12);
        assert_eq!(cursor.progress(), 67);
    }

    #[test]
    fn progress_endpoints() {
        let mut cursor = ingress_cursor();
        // 1/12 = 8.33
        assert_eq!(cursor.progress(), 8);
        while cursor.advance() {}
        assert_eq!(cursor.progress(), 100);
    }

    #[test]
    fn progress_rounds_half_up() {
        // 1/8 = 12.5
        let cursor = ProcedureCursor::new(vec![8]).unwrap();
        assert_eq!(cursor.progress(), 13);
    }
}
