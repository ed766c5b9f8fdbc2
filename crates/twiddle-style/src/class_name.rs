#![forbid(unsafe_code)]

//! CSS class names.
//!
//! Every view gets a block name `tp-<view>v`. Elements append `_<elem>` and
//! modifiers append `--<modifier>`:
//!
//! | Call | Class |
//! |------|-------|
//! | `ClassName::new("txt").block()` | `tp-txtv` |
//! | `ClassName::new("txt").elem("i")` | `tp-txtv_i` |
//! | `ClassName::new("txt").modifier("num")` | `tp-txtv--num` |
//! | `ClassName::new("").modifier("disabled")` | `tp-v--disabled` |

/// Prefix shared by every class name.
pub const CSS_PREFIX: &str = "tp";

/// Class name builder for one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassName {
    view: &'static str,
}

impl ClassName {
    #[must_use]
    pub const fn new(view: &'static str) -> Self {
        Self { view }
    }

    /// The block class, e.g. `tp-txtv`.
    #[must_use]
    pub fn block(&self) -> String {
        format!("{CSS_PREFIX}-{}v", self.view)
    }

    /// An element class, e.g. `tp-txtv_i`.
    #[must_use]
    pub fn elem(&self, elem: &str) -> String {
        format!("{}_{elem}", self.block())
    }

    /// A block modifier class, e.g. `tp-txtv--num`.
    #[must_use]
    pub fn modifier(&self, modifier: &str) -> String {
        format!("{}--{modifier}", self.block())
    }

    /// An element modifier class, e.g. `tp-fldv_b--expanded`.
    #[must_use]
    pub fn elem_modifier(&self, elem: &str, modifier: &str) -> String {
        format!("{}--{modifier}", self.elem(elem))
    }
}
