/// Target state definitions for tracking a category page through the pipeline
///
/// This module defines every state a page target can be in during a run and
/// the transitions allowed between them.
use std::fmt;

/// Represents the current state of a page target in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetState {
    // ===== Active States =====
    /// Target is configured but processing has not started
    Pending,

    /// Raw HTML is being fetched over plain HTTP
    Fetching,

    /// The fetched document is being checked for a "load more" control
    Detecting,

    /// A browser session is expanding the page
    Loading,

    /// Product blocks are being turned into records
    Extracting,

    /// Records are being handed to the sink
    Writing,

    // ===== Terminal States =====
    /// Output file was written
    Done,

    /// Processing stopped with an error; nothing was written
    Failed,
}

impl TargetState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if this is an active state (target may still be processed)
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if moving from `self` to `next` is a legal step
    ///
    /// The pipeline is `Pending → Fetching → Detecting → (Extracting |
    /// Loading → Extracting) → Writing → Done`; any active state may fail.
    pub fn can_transition_to(&self, next: TargetState) -> bool {
        use TargetState::*;

        if next == Failed {
            return self.is_active();
        }

        matches!(
            (self, next),
            (Pending, Fetching)
                | (Fetching, Detecting)
                | (Detecting, Extracting)
                | (Detecting, Loading)
                | (Loading, Extracting)
                | (Extracting, Writing)
                | (Writing, Done)
        )
    }

    /// Short lowercase name used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Detecting => "detecting",
            Self::Loading => "loading",
            Self::Extracting => "extracting",
            Self::Writing => "writing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
