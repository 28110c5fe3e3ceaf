//! Classification of pull request actions into deployment triggers.

use crate::github::PullRequestAction;

/// What an action asks the reconciler to do once the actor is authorised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The pull request was opened, reopened, or pushed to.
    PullRequestChanged,
    /// The trigger label was added.
    TriggerLabelAdded,
    /// Some other label was added.
    UnrelatedLabel,
    /// The action never deploys (closed and anything unrecognised).
    Ignored,
}

impl Trigger {
    /// Classifies `action` against the configured trigger label.
    #[must_use]
    pub fn classify(action: &PullRequestAction, trigger_label: &str) -> Self {
        match action {
            PullRequestAction::Opened
            | PullRequestAction::Reopened
            | PullRequestAction::Synchronize => Self::PullRequestChanged,
            PullRequestAction::Labeled { label } if label == trigger_label => {
                Self::TriggerLabelAdded
            }
            PullRequestAction::Labeled { .. } => Self::UnrelatedLabel,
            PullRequestAction::Closed | PullRequestAction::Other(_) => Self::Ignored,
        }
    }

    /// Whether a review app should be created.
    #[must_use]
    pub const fn creates_app(self) -> bool {
        matches!(self, Self::PullRequestChanged | Self::TriggerLabelAdded)
    }

    /// Whether the review app label should be added to the pull request.
    #[must_use]
    pub const fn adds_label(self) -> bool {
        matches!(self, Self::PullRequestChanged)
    }
}
