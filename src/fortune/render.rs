//! Text presentation of a selection.

use crate::fortune::selector::{Mode, Selection};
use std::fmt;

/// Shown when there is nothing to pick from.
pub const NO_FORTUNES: &str = "No fortunes loaded.";

/// Display-ready fortune with its progress line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// `"3 / 48"`: the list position in deterministic mode, cycle progress in random mode.
    pub count: Option<String>,
}

pub fn render(selection: Option<&Selection>, mode: Mode, total: usize) -> Rendered {
    let Some(sel) = selection else {
        return Rendered {
            text: NO_FORTUNES.to_string(),
            count: None,
        };
    };
    let position = match mode {
        Mode::Deterministic => sel.index + 1,
        Mode::Random => sel.seen_count.unwrap_or(1),
    };
    Rendered {
        text: sel.value.clone(),
        count: Some(format!("{} / {}", position, total)),
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)?;
        if let Some(count) = &self.count {
            write!(f, "\n{}", count)?;
        }
        Ok(())
    }
}
