#![forbid(unsafe_code)]

//! Viewport classification.

/// Widths at or below this many logical pixels use the mobile layout.
pub const DEFAULT_BREAKPOINT: u32 = 980;

/// Layout class derived from the window width. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Viewport {
    Desktop,
    Mobile,
}

impl Viewport {
    /// Classify `width` against an explicit breakpoint (inclusive for mobile).
    #[must_use]
    pub const fn classify_with(width: u32, breakpoint: u32) -> Self {
        if width <= breakpoint {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    /// Classify `width` against [`DEFAULT_BREAKPOINT`].
    #[must_use]
    pub const fn classify(width: u32) -> Self {
        Self::classify_with(width, DEFAULT_BREAKPOINT)
    }

    #[must_use]
    pub const fn is_mobile(self) -> bool {
        matches!(self, Self::Mobile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_is_inclusive() {
        assert_eq!(Viewport::classify(0), Viewport::Mobile);
        assert_eq!(Viewport::classify(980), Viewport::Mobile);
        assert_eq!(Viewport::classify(981), Viewport::Desktop);
        assert_eq!(Viewport::classify(1920), Viewport::Desktop);
    }

    #[test]
    fn custom_breakpoint() {
        assert_eq!(Viewport::classify_with(700, 640), Viewport::Desktop);
        assert!(Viewport::classify_with(640, 640).is_mobile());
    }
}
