//! Tri-state selection values.

use std::fmt;

/// Selection state of one channel of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Selection {
    Selected,
    Unselected,
    /// No decision yet.
    #[default]
    Undefined,
}

impl Selection {
    #[inline]
    pub fn is_defined(self) -> bool {
        self != Selection::Undefined
    }

    /// Maps a signed literal to a selection; `0` is undefined.
    pub fn from_literal(literal: i32) -> Self {
        match literal.signum() {
            1 => Selection::Selected,
            -1 => Selection::Unselected,
            _ => Selection::Undefined,
        }
    }
}

impl From<bool> for Selection {
    fn from(selected: bool) -> Self {
        if selected {
            Selection::Selected
        } else {
            Selection::Unselected
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Selection::Selected => "selected",
            Selection::Unselected => "unselected",
            Selection::Undefined => "undefined",
        })
    }
}
