use serde::{Deserialize, Serialize};

/// A priced exam product. `base_price` keeps the dataset's display string
/// ("S/ 20.00"); it is parsed only when a quote is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(alias = "codigo")]
    pub code: String,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(alias = "precio", alias = "price")]
    pub base_price: String,
}

impl CatalogItem {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        base_price: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            base_price: base_price.into(),
        }
    }
}
