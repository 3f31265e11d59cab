/// Phase definitions for tracking one analysis run
///
/// A run moves strictly forward through these phases; none is re-entered.
use std::fmt;

/// Represents the current phase of an analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisPhase {
    // ===== Active Phases =====
    /// Run created, nothing sent yet
    Idle,

    /// Waiting for the page response
    Fetching,

    /// Draining the response body
    Reading,

    /// Extraction units and link probes in flight
    Analyzing,

    // ===== Terminal Phases =====
    /// Report produced
    Reported,

    /// Run ended with an `AnalysisError`
    Failed,
}

impl AnalysisPhase {
    /// Returns true if this is a terminal phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Reported | Self::Failed)
    }

    /// Returns true if the run may move from this phase to `next`
    ///
    /// Every active phase can fail; success follows the fixed
    /// `Idle -> Fetching -> Reading -> Analyzing -> Reported` order.
    pub fn can_transition_to(&self, next: AnalysisPhase) -> bool {
        match (self, next) {
            (Self::Idle, Self::Fetching)
            | (Self::Fetching, Self::Reading)
            | (Self::Reading, Self::Analyzing)
            | (Self::Analyzing, Self::Reported) => true,
            (current, Self::Failed) => !current.is_terminal() && *current != Self::Idle,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Reading => "reading",
            Self::Analyzing => "analyzing",
            Self::Reported => "reported",
            Self::Failed => "failed",
        }
    }

    /// Returns all phases in lifecycle order
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::Idle,
            Self::Fetching,
            Self::Reading,
            Self::Analyzing,
            Self::Reported,
            Self::Failed,
        ]
    }
}

impl fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
