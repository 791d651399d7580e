//! Catalog seed file: the mock backend's products and users.

use std::path::Path;

use cart::{Product, ProductId};
use checkout::{InMemoryProductCatalog, MockUser, MockUserDirectory};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Contents of the catalog seed file.
///
/// ```json
/// { "products": [{ "id": "p1", "name": "Print", "price": 150000, "stock": 3 }],
///   "users": [{ "id": "u1", "email": "ana@example.com", "password": "secret" }] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub users: Vec<MockUser>,
}

impl CatalogSeed {
    /// Reads and parses a seed file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CliError::CatalogIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| CliError::CatalogFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Looks up a product by id.
    pub fn product(&self, id: &ProductId) -> Result<&Product, CliError> {
        self.products
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| CliError::UnknownProduct(id.clone()))
    }

    /// Builds an in-memory catalog backend from the seed.
    pub fn product_catalog(&self) -> InMemoryProductCatalog {
        InMemoryProductCatalog::with_products(self.products.iter().cloned())
    }

    /// Builds the mock user directory from the seed.
    pub fn user_directory(&self) -> MockUserDirectory {
        MockUserDirectory::new(self.users.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"products":[{"id":"p1","name":"Print","price":150000,"stock":3,"artist":"Ada"}],
                "users":[{"id":"u1","email":"ana@example.com","password":"secret"}]}"#,
        )
        .unwrap();

        let seed = CatalogSeed::load(&path).unwrap();
        assert_eq!(seed.product(&"p1".into()).unwrap().stock, 3);
        assert!(matches!(
            seed.product(&"p2".into()),
            Err(CliError::UnknownProduct(_))
        ));
        assert!(seed.user_directory().sign_in("ana@example.com", "secret").is_ok());
    }

    #[test]
    fn test_missing_and_invalid_seed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("none.json");
        assert!(matches!(
            CatalogSeed::load(&missing),
            Err(CliError::CatalogIo { .. })
        ));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "[1, 2").unwrap();
        assert!(matches!(
            CatalogSeed::load(&bad),
            Err(CliError::CatalogFormat { .. })
        ));
    }
}
