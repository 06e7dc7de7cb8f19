use crate::catalog::{Catalog, CatalogItem};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Código de examen desconocido: {0}")]
    UnknownCode(String),
}

/// Ordered, code-deduplicated set of selected catalog items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionSet {
    items: Vec<CatalogItem>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves codes against the catalog in request order. Repeated codes
    /// are dropped; the first unknown code fails the whole selection.
    pub fn from_codes<I, S>(catalog: &Catalog, codes: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::new();
        for code in codes {
            let code = code.as_ref().trim();
            let item = catalog
                .get(code)
                .ok_or_else(|| SelectionError::UnknownCode(code.to_string()))?;
            selection.add(item.clone());
        }
        Ok(selection)
    }

    /// Returns `false` (and leaves the set untouched) if the code is already present.
    pub fn add(&mut self, item: CatalogItem) -> bool {
        if self.contains(&item.code) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn remove(&mut self, code: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.code != code);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn contains(&self, code: &str) -> bool {
        self.items.iter().any(|item| item.code == code)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogItem> {
        self.items.iter()
    }
}

impl FromIterator<CatalogItem> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = CatalogItem>>(iter: T) -> Self {
        let mut selection = Self::new();
        for item in iter {
            selection.add(item);
        }
        selection
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a CatalogItem;
    type IntoIter = std::slice::Iter<'a, CatalogItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
