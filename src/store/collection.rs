//! Concurrent document collection.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// A value that can be stored in a [`Collection`].
pub trait Document: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
}

/// A named set of documents keyed by id.
///
/// Cloning is cheap; clones share the same underlying map. Query results are
/// returned in insertion order.
#[derive(Clone)]
pub struct Collection<D> {
    name: &'static str,
    docs: Arc<DashMap<Uuid, (u64, D)>>,
    next_seq: Arc<AtomicU64>,
}

impl<D: Document> Collection<D> {
    /// Create an empty collection.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            docs: Arc::new(DashMap::new()),
            next_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Insert a document, replacing any document with the same id.
    pub fn insert(&self, doc: D) -> D {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.docs.insert(doc.id(), (seq, doc.clone()));
        tracing::debug!(collection = self.name, id = %doc.id(), "Document inserted");
        doc
    }

    /// All documents matching `predicate`.
    pub fn find<P>(&self, predicate: P) -> Vec<D>
    where
        P: Fn(&D) -> bool,
    {
        let mut matched: Vec<(u64, D)> = self
            .docs
            .iter()
            .filter(|entry| predicate(&entry.value().1))
            .map(|entry| entry.value().clone())
            .collect();
        matched.sort_by_key(|(seq, _)| *seq);
        matched.into_iter().map(|(_, doc)| doc).collect()
    }

    /// All documents.
    pub fn find_all(&self) -> Vec<D> {
        self.find(|_| true)
    }

    pub fn find_by_id(&self, id: &Uuid) -> Option<D> {
        self.docs.get(id).map(|entry| entry.value().1.clone())
    }

    /// Mutate the document with `id` in place and return the new version.
    pub fn update<F>(&self, id: &Uuid, f: F) -> Option<D>
    where
        F: FnOnce(&mut D),
    {
        let mut entry = self.docs.get_mut(id)?;
        f(&mut entry.value_mut().1);
        Some(entry.value().1.clone())
    }

    /// Remove the document with `id`, returning it if it existed.
    pub fn delete(&self, id: &Uuid) -> Option<D> {
        self.docs.remove(id).map(|(_, (_, doc))| doc)
    }

    /// Remove every document, returning how many were removed.
    pub fn delete_all(&self) -> usize {
        let count = self.docs.len();
        self.docs.clear();
        tracing::debug!(collection = self.name, count, "Collection cleared");
        count
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: Uuid,
        text: &'static str,
    }

    impl Document for Note {
        fn id(&self) -> Uuid {
            self.id
        }
    }

    fn note(text: &'static str) -> Note {
        Note {
            id: Uuid::new_v4(),
            text,
        }
    }

    #[test]
    fn test_insert_and_find() {
        let notes = Collection::new("notes");
        let a = notes.insert(note("a"));
        notes.insert(note("b"));

        assert_eq!(notes.len(), 2);
        assert_eq!(notes.find_by_id(&a.id), Some(a));
        assert!(notes.find_by_id(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_results_keep_insertion_order() {
        let notes = Collection::new("notes");
        for text in ["one", "two", "three", "four"] {
            notes.insert(note(text));
        }
        let texts: Vec<_> = notes.find_all().into_iter().map(|n| n.text).collect();
        assert_eq!(texts, vec!["one", "two", "three", "four"]);

        let filtered: Vec<_> = notes
            .find(|n| n.text.len() > 3)
            .into_iter()
            .map(|n| n.text)
            .collect();
        assert_eq!(filtered, vec!["three", "four"]);
    }

    #[test]
    fn test_update_and_delete() {
        let notes = Collection::new("notes");
        let a = notes.insert(note("a"));

        let updated = notes.update(&a.id, |n| n.text = "z").unwrap();
        assert_eq!(updated.text, "z");
        assert!(notes.update(&Uuid::new_v4(), |n| n.text = "x").is_none());

        assert_eq!(notes.delete(&a.id).map(|n| n.text), Some("z"));
        assert!(notes.delete(&a.id).is_none());
        assert!(notes.is_empty());
    }

    #[test]
    fn test_delete_all_counts() {
        let notes = Collection::new("notes");
        notes.insert(note("a"));
        notes.insert(note("b"));
        let clone = notes.clone();

        assert_eq!(clone.delete_all(), 2);
        assert!(notes.is_empty());
        assert_eq!(notes.delete_all(), 0);
    }
}
