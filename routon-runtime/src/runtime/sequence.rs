use crate::core::Effector;

/// Tracked state of a single routine step.
#[derive(Clone, Copy, Debug, Default)]
struct StepState {
    /// Step has been entered at least once this run.
    registered: bool,
    /// Exit condition observed; consumed by the successor's advance.
    completed: bool,
    /// Terminal latch, never cleared for the remainder of the run.
    retired: bool,
}

/// Ordered completion state of an autonomous routine.
///
/// Steps are identified by a 1-based index into a table sized once at
/// construction from the routine length. Step 0 is an implicit sentinel
/// that always counts as completed and is never stored.
///
/// The `completed` gate of a step is short-lived: advancing step N clears
/// the gate of step N-1, so a step's completion is observable for exactly
/// the cycle window in which its successor launches. The retired latch is
/// what makes a finished step final.
#[derive(Debug)]
pub struct Sequencer {
    steps: Vec<StepState>,
    effectors: [bool; Effector::COUNT],
}

impl Sequencer {
    /// Construct a sequencer for a routine of the given length.
    pub fn new(step_count: usize) -> Self {
        Self {
            steps: vec![StepState::default(); step_count],
            effectors: [false; Effector::COUNT],
        }
    }

    /// Number of steps in the routine.
    #[inline]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    fn slot(&self, step: usize) -> usize {
        assert!(step >= 1, "step index is 1-based");
        assert!(
            step <= self.steps.len(),
            "step {} exceeds routine length {}",
            step,
            self.steps.len()
        );

        step - 1
    }

    /// Whether the step is permitted to run.
    ///
    /// True for the first step, otherwise true while the predecessor's
    /// completion gate is open.
    pub fn is_eligible(&self, step: usize) -> bool {
        let slot = self.slot(step);

        slot == 0 || self.steps[slot - 1].completed
    }

    /// Whether the step has been entered at least once this run.
    pub fn is_registered(&self, step: usize) -> bool {
        self.steps[self.slot(step)].registered
    }

    /// Whether the step has finished for good.
    pub fn is_retired(&self, step: usize) -> bool {
        self.steps[self.slot(step)].retired
    }

    /// Enter the step. Idempotent.
    pub fn register(&mut self, step: usize) {
        let slot = self.slot(step);

        self.steps[slot].registered = true;
    }

    /// Mark the step complete and close the predecessor's gate.
    ///
    /// This is the single transition primitive every executor calls on
    /// exit. The step must have been registered first.
    pub fn advance(&mut self, step: usize) {
        let slot = self.slot(step);

        debug_assert!(
            self.steps[slot].registered,
            "step {} advanced before registration",
            step
        );

        self.steps[slot].completed = true;
        self.steps[slot].retired = true;

        if slot > 0 {
            self.steps[slot - 1].completed = false;
        }
    }

    /// Whether the last step of the routine has retired.
    pub fn is_complete(&self) -> bool {
        self.steps.last().map_or(true, |step| step.retired)
    }

    /// Whether the end effector finished its portion of the current step.
    pub fn effector_finished(&self, effector: Effector) -> bool {
        self.effectors[effector as usize]
    }

    /// Record that the end effector finished its portion of the step.
    pub fn finish_effector(&mut self, effector: Effector) {
        self.effectors[effector as usize] = true;
    }

    /// Clear the end effector flag for a freshly registered step.
    pub fn rearm_effector(&mut self, effector: Effector) {
        self.effectors[effector as usize] = false;
    }
}
