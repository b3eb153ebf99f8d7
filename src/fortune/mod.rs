//! Fortune cookie engine.
//!
//! # Behavior
//!
//! - **Deterministic**: when the invocation carries an identifier (e.g. a tag link
//!   `https://yourdomain.example/?id=TAG123`), the identifier is hashed with
//!   FNV-1a and mapped onto the list. The same tag always shows the same fortune.
//! - **Random no-repeat**: without an identifier, fortunes are drawn at random
//!   and none repeats until the whole list has been shown once.
//!
//! # Usage
//!
//! ```
//! use fortunecookie::fortune::{FortuneList, Selector};
//! use fortunecookie::invocation::Identifier;
//! use fortunecookie::storage::MemoryStore;
//!
//! let mut selector = Selector::new(FortuneList::builtin(), MemoryStore::new());
//!
//! let tag = Identifier::parse(Some("TAG123"));
//! let a = selector.new_selection(tag.as_ref()).unwrap();
//! let b = selector.new_selection(tag.as_ref()).unwrap();
//! assert_eq!(a, b);
//!
//! let random = selector.new_selection(None).unwrap();
//! assert_eq!(random.seen_count, Some(1));
//! ```

pub mod hash;
pub mod list;
pub mod render;
pub mod selector;

pub use hash::fnv1a32;
pub use list::{FortuneList, ListError};
pub use render::{render, Rendered};
pub use selector::{
    new_selection, pick_deterministic, pick_random_no_repeat, Mode, Selection, Selector,
    MAX_DRAW_ATTEMPTS,
};
