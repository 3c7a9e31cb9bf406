//! The three inputs that decide whether the panel animates.

/// One signal taking a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalChange {
    /// The panel entered (`true`) or left (`false`) the visible area.
    Intersection(bool),
    /// The hosting document became visible or hidden.
    DocumentVisible(bool),
    /// The user's reduced-motion preference changed.
    ReducedMotion(bool),
}

/// Current value of every visibility input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilitySignals {
    pub element_intersecting: bool,
    pub document_visible: bool,
    pub reduced_motion: bool,
}

impl VisibilitySignals {
    /// Signals at mount time. The element is assumed to be in view; the other
    /// two are read from their sources by the caller.
    pub fn at_attach(document_visible: bool, reduced_motion: bool) -> Self {
        Self {
            element_intersecting: true,
            document_visible,
            reduced_motion,
        }
    }

    pub fn should_animate(&self) -> bool {
        self.element_intersecting && self.document_visible && !self.reduced_motion
    }

    /// Record a change. Returns whether the stored value actually changed.
    pub fn apply(&mut self, change: SignalChange) -> bool {
        let (slot, value) = match change {
            SignalChange::Intersection(v) => (&mut self.element_intersecting, v),
            SignalChange::DocumentVisible(v) => (&mut self.document_visible, v),
            SignalChange::ReducedMotion(v) => (&mut self.reduced_motion, v),
        };
        let changed = *slot != value;
        *slot = value;
        changed
    }
}

impl Default for VisibilitySignals {
    fn default() -> Self {
        Self::at_attach(true, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_animate_truth_table() {
        for bits in 0..8u8 {
            let signals = VisibilitySignals {
                element_intersecting: bits & 1 != 0,
                document_visible: bits & 2 != 0,
                reduced_motion: bits & 4 != 0,
            };
            let expected = bits == 0b011;
            assert_eq!(signals.should_animate(), expected, "bits {bits:03b}");
        }
    }

    #[test]
    fn test_attach_assumes_intersecting() {
        let signals = VisibilitySignals::at_attach(false, true);
        assert!(signals.element_intersecting);
        assert!(!signals.document_visible);
        assert!(signals.reduced_motion);
    }

    #[test]
    fn test_apply_reports_change() {
        let mut signals = VisibilitySignals::default();
        assert!(!signals.apply(SignalChange::Intersection(true)));
        assert!(signals.apply(SignalChange::ReducedMotion(true)));
        assert!(signals.reduced_motion);
        assert!(!signals.should_animate());
    }
}
