//! Locale-aware string ordering for roster views
//!
//! Names are ordered with the Unicode Collation Algorithm using the CLDR root
//! collation (`feruca`): base letters first, then accents, then case, with
//! lowercase before uppercase. Letters such as `Æ`, `Ł` or `ß` sort with their
//! Latin neighbours instead of after `Z`.

use std::cell::RefCell;
use std::cmp::Ordering;

use feruca::Collator;

thread_local! {
    static COLLATOR: RefCell<Collator> = RefCell::new(Collator::default());
}

/// Compares two strings in CLDR root collation order
pub fn compare(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| collator.borrow_mut().collate(a, b))
}
