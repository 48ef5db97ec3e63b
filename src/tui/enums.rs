//! Enumerations for TUI state management.

/// Which screen is showing.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AppState {
    Board,
    Help,
}

/// Which part of the board receives key presses.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Focus {
    Name,
    Due,
    List,
}

impl Focus {
    /// Next field in Tab order.
    pub fn next(self) -> Self {
        match self {
            Focus::Name => Focus::Due,
            Focus::Due => Focus::List,
            Focus::List => Focus::Name,
        }
    }

    /// Previous field in Tab order.
    pub fn prev(self) -> Self {
        match self {
            Focus::Name => Focus::List,
            Focus::Due => Focus::Name,
            Focus::List => Focus::Due,
        }
    }
}
