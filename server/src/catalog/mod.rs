mod item;
mod search;

pub use item::CatalogItem;
pub use search::normalize;

use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("No se pudo leer el catálogo: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catálogo inválido: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Código duplicado en el catálogo: {0}")]
    DuplicateCode(String),
}

/// Read-only exam catalog, loaded once at startup and shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            if index.insert(item.code.clone(), pos).is_some() {
                return Err(CatalogError::DuplicateCode(item.code.clone()));
            }
        }
        Ok(Self { items, index })
    }

    /// Loads a JSON array of `{codigo, nombre, precio}` records.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let items: Vec<CatalogItem> = serde_json::from_str(&content)?;
        let catalog = Self::from_items(items)?;

        tracing::info!("📚 Catálogo cargado: {:?} ({} exámenes)", path, catalog.len());
        Ok(catalog)
    }

    pub fn get(&self, code: &str) -> Option<&CatalogItem> {
        self.index.get(code).map(|&pos| &self.items[pos])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Accent- and case-insensitive name search, in catalog order.
    pub fn search(&self, query: &str) -> Vec<&CatalogItem> {
        let needle = normalize(query.trim());
        if needle.is_empty() {
            return self.items.iter().collect();
        }

        self.items
            .iter()
            .filter(|item| normalize(&item.name).contains(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> Catalog {
        Catalog::from_items(vec![
            CatalogItem::new("A1", "Glucosa", "S/ 20.00"),
            CatalogItem::new("B2", "Ácido Úrico", "S/ 18.50"),
            CatalogItem::new("C3", "Hemograma completo", "S/ 35.00"),
        ])
        .unwrap()
    }

    #[test]
    fn test_get_by_code() {
        let catalog = sample();
        assert_eq!(catalog.get("B2").unwrap().name, "Ácido Úrico");
        assert!(catalog.get("Z9").is_none());
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let result = Catalog::from_items(vec![
            CatalogItem::new("A1", "Glucosa", "S/ 20.00"),
            CatalogItem::new("A1", "Glucosa basal", "S/ 22.00"),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateCode(code)) if code == "A1"));
    }

    #[test]
    fn test_search_ignores_accents() {
        let catalog = sample();
        let found: Vec<&str> = catalog.search("acido").iter().map(|i| i.code.as_str()).collect();
        assert_eq!(found, vec!["B2"]);

        let found: Vec<&str> = catalog.search("URICO").iter().map(|i| i.code.as_str()).collect();
        assert_eq!(found, vec!["B2"]);
    }

    #[test]
    fn test_empty_query_returns_all_in_order() {
        let catalog = sample();
        let codes: Vec<&str> = catalog.search("  ").iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["A1", "B2", "C3"]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"codigo":"A1","nombre":"Glucosa","precio":"S/ 20.00"}},
                {{"codigo":"C3","nombre":"Hemograma","precio":"S/ 35.00"}}]"#
        )
        .unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("C3").unwrap().base_price, "S/ 35.00");
    }

    #[test]
    fn test_load_missing_file() {
        let result = Catalog::load("/nonexistent/catalog.json");
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
