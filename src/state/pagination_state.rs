/// Pagination state definitions for the page-by-page collection loop
///
/// The loop is a two-state machine: it keeps fetching pages until one of the
/// stop conditions moves it to `Done`, which is absorbing.
use std::fmt;
use url::Url;

/// Why a pagination run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// The page had no quote containers (ran past the end of content)
    EmptyPage,

    /// The page had no next-page link
    LastPage,

    /// The configured page limit was reached
    PageLimit,

    /// The next-page link pointed back at a page already visited
    LoopDetected,
}

impl StopReason {
    /// Short machine-friendly name used in logs and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyPage => "empty_page",
            Self::LastPage => "last_page",
            Self::PageLimit => "page_limit",
            Self::LoopDetected => "loop_detected",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::EmptyPage => "page contained no quotes",
            Self::LastPage => "no next-page link",
            Self::PageLimit => "page limit reached",
            Self::LoopDetected => "next-page link points to a visited page",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current state of the pagination loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationState {
    /// Fetch and extract the page at `url`; `page` is 1-based
    Fetching { url: Url, page: usize },

    /// No further pages will be fetched
    Done(StopReason),
}

impl PaginationState {
    /// Initial state of every run
    pub fn start(url: Url) -> Self {
        Self::Fetching { url, page: 1 }
    }

    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// Short state name, without the payload
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fetching { .. } => "fetching",
            Self::Done(_) => "done",
        }
    }

    /// Checks whether a transition to `next` is allowed
    ///
    /// `Fetching` may move to `Done` or to `Fetching` the immediately
    /// following page. `Done` allows no transitions.
    pub fn can_transition_to(&self, next: &PaginationState) -> bool {
        match (self, next) {
            (Self::Fetching { .. }, Self::Done(_)) => true,
            (Self::Fetching { page, .. }, Self::Fetching { page: next_page, .. }) => {
                *next_page == page + 1
            }
            (Self::Done(_), _) => false,
        }
    }
}

impl fmt::Display for PaginationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetching { url, page } => write!(f, "fetching page {} ({})", page, url),
            Self::Done(reason) => write!(f, "done ({})", reason),
        }
    }
}
