//! Search result / 搜索结果

use crate::schema::{Document, FieldMap, Marshaller};

/// Lazily unmarshalled documents over an already fetched hit list / 惰性解码的文档序列
///
/// Single pass: re-run the search to iterate again.
#[derive(Debug)]
pub struct Documents {
    fields: FieldMap,
    hits: std::vec::IntoIter<Document>,
    marshaller: Marshaller,
}

impl Documents {
    pub fn new(fields: FieldMap, hits: Vec<Document>) -> Self {
        Self {
            fields,
            hits: hits.into_iter(),
            marshaller: Marshaller::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new(FieldMap::new(), Vec::new())
    }
}

impl Iterator for Documents {
    type Item = Document;

    fn next(&mut self) -> Option<Self::Item> {
        let hit = self.hits.next()?;
        Some(self.marshaller.unmarshall(&self.fields, &hit))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.hits.size_hint()
    }
}

impl ExactSizeIterator for Documents {}

/// Search result: documents plus total match count / 搜索结果
#[derive(Debug)]
pub struct SearchResult {
    documents: Documents,
    /// Total number of matches (not only the returned page) / 匹配总数
    pub total: u64,
}

impl SearchResult {
    pub fn new(documents: Documents, total: u64) -> Self {
        Self { documents, total }
    }

    pub fn empty() -> Self {
        Self::new(Documents::empty(), 0)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn documents(self) -> Documents {
        self.documents
    }
}

impl IntoIterator for SearchResult {
    type Item = Document;
    type IntoIter = Documents;

    fn into_iter(self) -> Self::IntoIter {
        self.documents
    }
}
