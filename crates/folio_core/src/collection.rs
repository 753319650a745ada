//! Collection and tag indexes.
//!
//! Both indexes keep their members newest first. Documents published at the
//! same instant are ordered by source path, so repeated runs over unchanged
//! input always produce the same order.

use crate::document::Document;
use std::{cmp::Ordering, collections::BTreeMap};

/// Newest first, ties broken by source path.
pub fn compare_documents(a: &Document, b: &Document) -> Ordering {
    b.meta()
        .date
        .instant()
        .cmp(&a.meta().date.instant())
        .then_with(|| a.source().as_os_str().cmp(b.source().as_os_str()))
}

/// A named group of documents sharing a declared collection.
#[derive(Debug, Clone)]
pub struct Collection<'a> {
    name: String,
    documents: Vec<&'a Document>,
}

impl<'a> Collection<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in publish order (newest first).
    pub fn documents(&self) -> &[&'a Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Collections keyed by name, iterated in name order.
#[derive(Debug, Clone, Default)]
pub struct CollectionIndex<'a> {
    collections: BTreeMap<String, Collection<'a>>,
}

impl<'a> CollectionIndex<'a> {
    /// Group documents by [`Document::collection`].
    ///
    /// Every document lands in exactly one collection; documents without a
    /// declared collection go to [`crate::UNCATEGORIZED`].
    pub fn build(documents: impl IntoIterator<Item = &'a Document>) -> Self {
        let mut collections: BTreeMap<String, Collection<'a>> = BTreeMap::new();

        for doc in documents {
            collections
                .entry(doc.collection().to_owned())
                .or_insert_with(|| Collection {
                    name: doc.collection().to_owned(),
                    documents: Vec::new(),
                })
                .documents
                .push(doc);
        }

        for collection in collections.values_mut() {
            collection.documents.sort_by(|a, b| compare_documents(a, b));
        }

        Self { collections }
    }

    pub fn get(&self, name: &str) -> Option<&Collection<'a>> {
        self.collections.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collection<'a>> {
        self.collections.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Number of collections.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Total number of indexed documents.
    pub fn document_count(&self) -> usize {
        self.collections.values().map(Collection::len).sum()
    }
}

/// Group documents by collection name.
pub fn index<'a>(documents: impl IntoIterator<Item = &'a Document>) -> CollectionIndex<'a> {
    CollectionIndex::build(documents)
}

/// Documents grouped by tag, sorted alphabetically by tag name.
pub type TagIndex<'a> = BTreeMap<String, Vec<&'a Document>>;

/// Build the tag index. Documents without tags are left out.
pub fn index_tags<'a>(documents: impl IntoIterator<Item = &'a Document>) -> TagIndex<'a> {
    let mut tags: TagIndex<'a> = BTreeMap::new();

    for doc in documents {
        for tag in &doc.meta().tags {
            let members = tags.entry(tag.clone()).or_default();
            // A tag listed twice on one document still counts once.
            if !members.iter().any(|d| d.source() == doc.source()) {
                members.push(doc);
            }
        }
    }

    for members in tags.values_mut() {
        members.sort_by(|a, b| compare_documents(a, b));
    }

    tags
}
