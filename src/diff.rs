//! Listing comparison engine.
//!
//! Compares two listings of the same watch target and reports the keys
//! whose rows changed:
//! - keys present in only one listing (created or deleted objects)
//! - keys present in both whose size or last-modified differ
//!
//! A re-uploaded object that kept its byte size still shows up, because a
//! refreshed timestamp makes the rows differ. The result is a flat key
//! set; callers that need direction (new vs gone) can look keys up in the
//! listings themselves.

use std::collections::HashSet;

use crate::listing::Listing;

/// Keys whose entries differ between `old` and `new`.
///
/// `old` is `None` on a first run, when no snapshot exists yet; every key
/// of `new` is reported changed so the caller seeds its snapshot.
pub fn changed_keys(old: Option<&Listing>, new: &Listing) -> HashSet<String> {
    let Some(old) = old else {
        return new.keys().cloned().collect();
    };

    if old == new {
        return HashSet::new();
    }

    let mut changed = HashSet::new();

    for (key, new_entry) in &new.entries {
        match old.get(key) {
            Some(old_entry) if old_entry == new_entry => {}
            _ => {
                changed.insert(key.clone());
            }
        }
    }

    for key in old.keys() {
        if new.get(key).is_none() {
            changed.insert(key.clone());
        }
    }

    changed
}
