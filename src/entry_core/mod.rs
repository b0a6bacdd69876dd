//! Core entry collection logic without I/O operations.
//!
//! [`EntryCollection`] holds the in-memory list of entries and keeps it
//! sorted by creation time, newest first. It knows nothing about disk; the
//! store pairs it with an [`EntryStorage`](crate::entry_io::EntryStorage).

use crate::entry::Entry;
use uuid::Uuid;

/// The ordered in-memory set of entries, newest first.
///
/// # Examples
///
/// ```
/// use moodiary::entry_core::EntryCollection;
/// use moodiary::Entry;
/// use chrono::{Duration, Utc};
///
/// let now = Utc::now();
/// let older = Entry::builder("😌", "Older", "…").created_at(now - Duration::days(1)).build();
/// let newer = Entry::builder("😊", "Newer", "…").created_at(now).build();
///
/// let mut collection = EntryCollection::default();
/// collection.insert(older);
/// collection.insert(newer);
///
/// let titles: Vec<&str> = collection.entries().iter().map(|e| e.title()).collect();
/// assert_eq!(titles, ["Newer", "Older"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryCollection {
    entries: Vec<Entry>,
}

impl EntryCollection {
    /// Builds a collection from unsorted entries.
    pub fn from_unsorted(mut entries: Vec<Entry>) -> Self {
        sort_newest_first(&mut entries);
        EntryCollection { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Replaces the whole collection with the result of a fresh load.
    pub fn replace_all(&mut self, entries: Vec<Entry>) {
        *self = Self::from_unsorted(entries);
    }

    /// Inserts an entry, keeping newest-first order.
    ///
    /// A freshly created entry lands at the head. An entry older than some
    /// existing ones goes after every entry that is at least as new, so ties
    /// keep insertion order.
    pub fn insert(&mut self, entry: Entry) {
        let created_at = entry.created_at();
        let position = self
            .entries
            .partition_point(|existing| existing.created_at() > created_at);
        self.entries.insert(position, entry);
    }

    /// Replaces the entry with the same id in place.
    ///
    /// The stored `created_at` is kept, so the position stays correct.
    /// Returns `false` and leaves the collection untouched when no entry has
    /// that id.
    pub fn replace(&mut self, mut entry: Entry) -> bool {
        match self.entries.iter_mut().find(|existing| existing.id() == entry.id()) {
            Some(slot) => {
                entry.keep_created_at(slot.created_at());
                *slot = entry;
                true
            }
            None => false,
        }
    }

    /// Removes every entry with the given id and returns how many were removed.
    pub fn remove(&mut self, id: Uuid) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id() != id);
        before - self.entries.len()
    }

    /// Cloned snapshot for publishing to observers.
    pub fn to_vec(&self) -> Vec<Entry> {
        self.entries.clone()
    }
}

/// Sorts by creation time descending. Stable, so equal timestamps keep their
/// relative order.
pub fn sort_newest_first(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
}

/// Returns true when entries are in newest-first order.
pub fn is_newest_first(entries: &[Entry]) -> bool {
    entries
        .windows(2)
        .all(|pair| pair[0].created_at() >= pair[1].created_at())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()
    }

    fn entry_at(title: &str, offset_minutes: i64) -> Entry {
        Entry::builder("😊", title, "content")
            .created_at(base_time() + Duration::minutes(offset_minutes))
            .build()
    }

    fn titles(collection: &EntryCollection) -> Vec<&str> {
        collection.entries().iter().map(|e| e.title()).collect()
    }

    #[test]
    fn test_insert_newest_goes_to_head() {
        let mut collection = EntryCollection::default();
        collection.insert(entry_at("A", 0));
        collection.insert(entry_at("B", 10));
        collection.insert(entry_at("C", 20));

        assert_eq!(titles(&collection), ["C", "B", "A"]);
    }

    #[test]
    fn test_insert_keeps_order_for_any_sequence() {
        let offsets = [5, -3, 40, 0, 12, -30, 12, 7];
        let mut collection = EntryCollection::default();

        for (i, offset) in offsets.iter().enumerate() {
            collection.insert(entry_at(&format!("e{}", i), *offset));
            assert!(is_newest_first(collection.entries()));
        }
        assert_eq!(collection.len(), offsets.len());
    }

    #[test]
    fn test_insert_equal_timestamps_keeps_insertion_order() {
        let mut collection = EntryCollection::default();
        collection.insert(entry_at("first", 0));
        collection.insert(entry_at("second", 0));

        assert_eq!(titles(&collection), ["first", "second"]);
    }

    #[test]
    fn test_from_unsorted_sorts_descending() {
        let collection =
            EntryCollection::from_unsorted(vec![entry_at("A", 0), entry_at("C", 20), entry_at("B", 10)]);
        assert_eq!(titles(&collection), ["C", "B", "A"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut collection =
            EntryCollection::from_unsorted(vec![entry_at("A", 0), entry_at("B", 10), entry_at("C", 20)]);
        let mut middle = collection.entries()[1].clone();
        middle.add_comment("noted", base_time());

        assert!(collection.replace(middle.clone()));
        assert_eq!(titles(&collection), ["C", "B", "A"]);
        assert_eq!(collection.entries()[1], middle);
    }

    #[test]
    fn test_replace_keeps_original_creation_time() {
        let a = entry_at("A", 0);
        let mut collection = EntryCollection::from_unsorted(vec![a.clone(), entry_at("B", 60)]);

        let moved = Entry::builder("😊", "A", "rewritten")
            .id(a.id())
            .created_at(base_time() + Duration::minutes(300))
            .build();
        assert!(collection.replace(moved));

        assert!(is_newest_first(collection.entries()));
        assert_eq!(titles(&collection), ["B", "A"]);
        assert_eq!(collection.entries()[1].created_at(), a.created_at());
        assert_eq!(collection.entries()[1].content(), "rewritten");
    }

    #[test]
    fn test_replace_unknown_id_is_a_no_op() {
        let mut collection = EntryCollection::from_unsorted(vec![entry_at("A", 0)]);
        let before = collection.clone();

        assert!(!collection.replace(entry_at("stranger", 5)));
        assert_eq!(collection, before);
    }

    #[test]
    fn test_remove_drops_every_match() {
        let duplicate = entry_at("dup", 0);
        let mut collection = EntryCollection::default();
        collection.insert(duplicate.clone());
        collection.insert(entry_at("other", 5));
        collection.insert(duplicate.clone());

        assert_eq!(collection.remove(duplicate.id()), 2);
        assert_eq!(titles(&collection), ["other"]);
        assert_eq!(collection.remove(duplicate.id()), 0);
    }

    #[test]
    fn test_replace_all_discards_previous_contents() {
        let mut collection = EntryCollection::from_unsorted(vec![entry_at("old", 0)]);
        collection.replace_all(vec![entry_at("x", 1), entry_at("y", 2)]);

        assert_eq!(titles(&collection), ["y", "x"]);
        assert!(collection.get(collection.entries()[0].id()).is_some());
    }
}
