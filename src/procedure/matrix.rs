//! Completion matrix
//!
//! One flag per (phase, step), all false at procedure start. Flags are only
//! ever set; nothing in the API clears one, so completion is monotonic for
//! the life of the matrix.

use super::library::{ProcedureLibrary, StepId};

/// Per-step completion flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionMatrix {
    flags: Vec<Vec<bool>>,
}

impl CompletionMatrix {
    /// All-false matrix with `shape[i]` steps in phase `i + 1`.
    #[must_use]
    pub fn new(shape: &[usize]) -> Self {
        Self {
            flags: shape.iter().map(|&steps| vec![false; steps]).collect(),
        }
    }

    /// All-false matrix shaped like `library`.
    #[must_use]
    pub fn for_library(library: &ProcedureLibrary) -> Self {
        Self::new(&library.shape())
    }

    /// Marks a step complete. Returns `true` if the flag was newly set.
    ///
    /// Out-of-range ids are ignored.
    pub fn mark(&mut self, id: StepId) -> bool {
        match self.flag_mut(id) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }

    /// Returns whether a step is complete. Out-of-range ids are incomplete.
    #[must_use]
    pub fn is_complete(&self, id: StepId) -> bool {
        id.phase
            .checked_sub(1)
            .and_then(|p| self.flags.get(p))
            .and_then(|steps| id.step.checked_sub(1).and_then(|s| steps.get(s)))
            .copied()
            .unwrap_or(false)
    }

    /// Returns whether every step of a 1-based phase is complete.
    #[must_use]
    pub fn is_phase_complete(&self, phase: usize) -> bool {
        phase
            .checked_sub(1)
            .and_then(|p| self.flags.get(p))
            .is_some_and(|steps| steps.iter().all(|&done| done))
    }

    /// Returns whether every step of every phase is complete.
    #[must_use]
    pub fn is_procedure_complete(&self) -> bool {
        self.flags.iter().flatten().all(|&done| done)
    }

    /// Number of completed steps.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.flags.iter().flatten().filter(|&&done| done).count()
    }

    /// Total number of steps.
    #[must_use]
    pub fn total(&self) -> usize {
        self.flags.iter().map(Vec::len).sum()
    }

    /// Number of phases.
    #[must_use]
    pub fn phase_count(&self) -> usize {
        self.flags.len()
    }

    fn flag_mut(&mut self, id: StepId) -> Option<&mut bool> {
        let steps = self.flags.get_mut(id.phase.checked_sub(1)?)?;
        steps.get_mut(id.step.checked_sub(1)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_all_false() {
        let matrix = CompletionMatrix::new(&[3, 3, 4, 2]);
        assert_eq!(matrix.total(), 12);
        assert_eq!(matrix.completed_count(), 0);
        assert_eq!(matrix.phase_count(), 4);
        assert!(!matrix.is_phase_complete(1));
        assert!(!matrix.is_procedure_complete());
    }

    #[test]
    fn mark_reports_new_flags_only() {
        let mut matrix = CompletionMatrix::new(&[2]);
        assert!(matrix.mark(StepId::new(1, 1)));
        assert!(!matrix.mark(StepId::new(1, 1)));
        assert!(matrix.is_complete(StepId::new(1, 1)));
        assert!(!matrix.is_complete(StepId::new(1, 2)));
    }

    #[test]
    fn out_of_range_ids_are_ignored() {
        let mut matrix = CompletionMatrix::new(&[1]);
        assert!(!matrix.mark(StepId::new(0, 1)));
        assert!(!matrix.mark(StepId::new(1, 2)));
        assert!(!matrix.mark(StepId::new(2, 1)));
        assert!(!matrix.is_complete(StepId::new(2, 1)));
        assert!(!matrix.is_phase_complete(0));
        assert!(!matrix.is_phase_complete(2));
        assert_eq!(matrix.completed_count(), 0);
    }

    #[test]
    fn phase_complete_iff_every_step_flagged() {
        let mut matrix = CompletionMatrix::new(&[2, 1]);
        matrix.mark(StepId::new(1, 2));
        assert!(!matrix.is_phase_complete(1));
        matrix.mark(StepId::new(1, 1));
        assert!(matrix.is_phase_complete(1));
        assert!(!matrix.is_procedure_complete());
        matrix.mark(StepId::new(2, 1));
        assert!(matrix.is_procedure_complete());
    }
}
