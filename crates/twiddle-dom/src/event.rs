#![forbid(unsafe_code)]

/// Kinds of events views listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    /// Committed edit of a form control.
    Change,
    /// In-progress edit of a form control.
    Input,
    KeyDown,
    KeyUp,
    Blur,
    PointerDown,
    PointerMove,
    PointerUp,
}

/// An event delivered to element listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    pub kind: EventKind,
    /// Key name for keyboard events, e.g. `"ArrowUp"`.
    pub key: Option<String>,
    pub shift_key: bool,
    pub alt_key: bool,
    /// Horizontal pointer position as a fraction of the element width.
    pub ratio: Option<f64>,
    /// Horizontal pointer travel since the press, in pixels.
    pub delta_x: Option<f64>,
}

impl DomEvent {
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            key: None,
            shift_key: false,
            alt_key: false,
            ratio: None,
            delta_x: None,
        }
    }

    #[must_use]
    pub fn key_down(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::new(EventKind::KeyDown)
        }
    }

    #[must_use]
    pub fn key_up(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::new(EventKind::KeyUp)
        }
    }

    #[must_use]
    pub fn pointer(kind: EventKind, ratio: f64) -> Self {
        Self {
            ratio: Some(ratio),
            ..Self::new(kind)
        }
    }

    #[must_use]
    pub fn drag(kind: EventKind, delta_x: f64) -> Self {
        Self {
            delta_x: Some(delta_x),
            ..Self::new(kind)
        }
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift_key = true;
        self
    }

    #[must_use]
    pub fn with_alt(mut self) -> Self {
        self.alt_key = true;
        self
    }
}
