//! Paginated collection envelope.

use serde::{Deserialize, Serialize};

use crate::Identified;

/// An ordered page of records plus pagination metadata.
///
/// The backend is not consistent about envelope names: catalog listings put
/// records under `content` and the total under `totalElements`, user listings
/// use `users` and `total`, some endpoints use `items`. All of them decode into
/// this type. Fields the backend omits are derived by [`Page::normalized`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The records on this page.
    #[serde(alias = "items", alias = "users", default = "Vec::new")]
    pub content: Vec<T>,
    /// Total number of records across all pages.
    #[serde(alias = "total", default)]
    pub total_elements: u64,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Current page number (0-indexed).
    #[serde(default)]
    pub page: u32,
    /// Requested page size.
    #[serde(default)]
    pub size: u32,
    /// Whether this is the first page.
    #[serde(default)]
    pub first: bool,
    /// Whether this is the last page.
    #[serde(default)]
    pub last: bool,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            page: 0,
            size: 0,
            first: true,
            last: true,
        }
    }
}

impl<T> Page<T> {
    /// Fills in metadata the backend left out.
    ///
    /// `size` falls back to the number of records, `total_pages` is computed
    /// from the total and the size, and the first/last flags follow from the
    /// page number.
    pub fn normalized(mut self) -> Self {
        if self.size == 0 {
            self.size = u32::try_from(self.content.len()).unwrap_or(u32::MAX);
        }
        if self.total_elements < self.content.len() as u64 {
            self.total_elements = self.content.len() as u64;
        }
        if self.total_pages == 0 && self.size > 0 {
            let pages = self.total_elements.div_ceil(u64::from(self.size));
            self.total_pages = u32::try_from(pages).unwrap_or(u32::MAX);
        }
        self.first = self.page == 0;
        self.last = self.total_pages == 0 || self.page.saturating_add(1) >= self.total_pages;
        self
    }

    /// Number of records on this page.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true if the page holds no records.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl<T: Identified> Page<T> {
    /// Finds a record by identifier.
    pub fn find(&self, id: &str) -> Option<&T> {
        self.content.iter().find(|r| r.id() == id)
    }

    /// Finds a record by identifier for in-place edits.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut T> {
        self.content.iter_mut().find(|r| r.id() == id)
    }

    /// Replaces the record with the same identifier, or inserts it at the front.
    ///
    /// Returns true if an existing record was replaced.
    pub fn upsert(&mut self, record: T) -> bool {
        if let Some(existing) = self.find_mut(record.id()) {
            *existing = record;
            return true;
        }
        self.content.insert(0, record);
        self.total_elements += 1;
        false
    }

    /// Removes the record with the given identifier.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.content.iter().position(|r| r.id() == id)?;
        self.total_elements = self.total_elements.saturating_sub(1);
        Some(self.content.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
    struct Row {
        id: String,
    }

    impl Identified for Row {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn row(id: &str) -> Row {
        Row { id: id.to_string() }
    }

    #[test]
    fn test_decode_content_envelope() {
        let json = r#"{"content":[{"id":"a"},{"id":"b"}],"totalElements":12,"totalPages":6,"page":0,"size":2,"first":true,"last":false}"#;
        let page: Page<Row> = serde_json::from_str(json).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page.total_elements, 12);
        assert_eq!(page.total_pages, 6);
        assert!(!page.last);
    }

    #[test]
    fn test_decode_users_envelope_and_normalize() {
        let json = r#"{"users":[{"id":"1"},{"id":"2"},{"id":"3"}],"total":7,"page":2,"size":3}"#;
        let page: Page<Row> = serde_json::from_str::<Page<Row>>(json).unwrap().normalized();
        assert_eq!(page.len(), 3);
        assert_eq!(page.total_elements, 7);
        assert_eq!(page.total_pages, 3);
        assert!(!page.first);
        assert!(page.last);
    }

    #[test]
    fn test_decode_items_envelope() {
        let json = r#"{"items":[{"id":"x"}]}"#;
        let page: Page<Row> = serde_json::from_str::<Page<Row>>(json).unwrap().normalized();
        assert_eq!(page.content, vec![row("x")]);
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.size, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.first && page.last);
    }

    #[test]
    fn test_normalize_last_page_number() {
        let json = r#"{"content":[{"id":"a"}],"totalElements":1,"totalPages":1,"page":4294967295,"size":20}"#;
        let page = serde_json::from_str::<Page<Row>>(json).unwrap().normalized();
        assert_eq!(page.page, u32::MAX);
        assert!(!page.first);
        assert!(page.last);
    }

    #[test]
    fn test_upsert_and_remove() {
        let mut page = Page {
            content: vec![row("a"), row("b")],
            total_elements: 2,
            ..Page::default()
        };

        assert!(page.upsert(row("b")));
        assert_eq!(page.len(), 2);

        assert!(!page.upsert(row("c")));
        assert_eq!(page.content[0], row("c"));
        assert_eq!(page.total_elements, 3);

        assert_eq!(page.remove("a"), Some(row("a")));
        assert_eq!(page.remove("a"), None);
        assert_eq!(page.total_elements, 2);
    }
}
