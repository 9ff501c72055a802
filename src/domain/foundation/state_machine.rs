//! State machine trait for status enums with restricted transitions.

use super::ValidationError;

/// Status enums whose lifecycle only moves along declared edges.
///
/// Implementors list the outgoing edges of each state; membership
/// checks and validated transitions come for free.
///
/// ```ignore
/// let voided = InvoiceStatus::Issued.transition_to(InvoiceStatus::Voided)?;
/// assert!(voided.is_terminal());
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// States reachable in one step from `self`.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if a transition from self to target is allowed.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs the transition, or reports the illegal edge.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "status",
                format!("cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// A state with no outgoing edges.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
