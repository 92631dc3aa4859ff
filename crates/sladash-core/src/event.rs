#![forbid(unsafe_code)]

//! Host events fed into the [`Engine`](crate::Engine).

/// Normalized keyboard key. Only the keys the dashboard reacts to are named.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Other(Box<str>),
}

impl Key {
    /// Normalize a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            other => Self::Other(other.into()),
        }
    }
}

/// One discrete DOM event, with the element it targeted when there is one.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent<E> {
    Click { target: Option<E> },
    Input { target: Option<E> },
    KeyDown { target: Option<E>, key: Key },
    /// Window resized to `width` logical pixels.
    Resize { width: u32 },
}

/// Outcome of routing one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// The host should cancel the browser's default action.
    pub prevent_default: bool,
}
