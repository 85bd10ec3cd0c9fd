//! Category→products table for the interest pollers.
//!
//! Loaded from YAML (`config/categories.yaml`). Categories keep their file
//! order; the regional poller iterates them in declaration order.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub products: Vec<String>,
}

impl CategoryConfig {
    /// Generate a filename-safe slug from the category name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoriesFile {
    pub categories: Vec<CategoryConfig>,
}

impl CategoriesFile {
    /// Finds a category by slug.
    #[must_use]
    pub fn find(&self, slug: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.slug() == slug)
    }
}

/// Load and validate the categories table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_categories(path: &Path) -> Result<CategoriesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CategoriesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: CategoriesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CategoriesFileParse)?;

    validate_categories(&file)?;

    Ok(file)
}

fn validate_categories(file: &CategoriesFile) -> Result<(), ConfigError> {
    if file.categories.is_empty() {
        return Err(ConfigError::Validation(
            "categories table must not be empty".to_string(),
        ));
    }

    let mut seen_slugs = HashSet::new();
    for category in &file.categories {
        if category.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category name must be non-empty".to_string(),
            ));
        }
        if category.products.is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{}' has no products",
                category.name
            )));
        }

        let mut seen_products = HashSet::new();
        for product in &category.products {
            if product.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "category '{}' contains an empty product name",
                    category.name
                )));
            }
            if !seen_products.insert(product.to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate product '{}' in category '{}'",
                    product, category.name
                )));
            }
        }

        let slug = category.slug();
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category slug: '{}' (from category '{}')",
                slug, category.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, products: &[&str]) -> CategoryConfig {
        CategoryConfig {
            name: name.to_string(),
            products: products.iter().map(|p| (*p).to_string()).collect(),
        }
    }

    #[test]
    fn slug_simple_name() {
        assert_eq!(category("Telefonia", &["Celular"]).slug(), "telefonia");
    }

    #[test]
    fn slug_accented_characters() {
        // Non-ASCII chars are stripped; no dash inserted between adjacent ASCII chars
        assert_eq!(
            category("Eletroportáteis", &["Airfryer"]).slug(),
            "eletroportteis"
        );
    }

    #[test]
    fn slug_spaces_become_dashes() {
        assert_eq!(
            category("Celulares e Telefonia", &["Celular"]).slug(),
            "celulares-e-telefonia"
        );
    }

    #[test]
    fn validate_rejects_empty_table() {
        let file = CategoriesFile { categories: vec![] };
        let err = validate_categories(&file).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn validate_rejects_empty_category_name() {
        let file = CategoriesFile {
            categories: vec![category("  ", &["Celular"])],
        };
        let err = validate_categories(&file).unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn validate_rejects_category_without_products() {
        let file = CategoriesFile {
            categories: vec![category("Telefonia", &[])],
        };
        let err = validate_categories(&file).unwrap_err();
        assert!(err.to_string().contains("no products"));
    }

    #[test]
    fn validate_rejects_duplicate_product() {
        let file = CategoriesFile {
            categories: vec![category("Telefonia", &["Celular", "celular"])],
        };
        let err = validate_categories(&file).unwrap_err();
        assert!(err.to_string().contains("duplicate product"));
    }

    #[test]
    fn validate_rejects_duplicate_slug() {
        let file = CategoriesFile {
            categories: vec![
                category("Telefonia", &["Celular"]),
                category("telefonia", &["iPhone"]),
            ],
        };
        let err = validate_categories(&file).unwrap_err();
        assert!(err.to_string().contains("duplicate category slug"));
    }

    #[test]
    fn validate_accepts_valid_table() {
        let file = CategoriesFile {
            categories: vec![
                category("Telefonia", &["Celular", "iPhone"]),
                category("Televisores", &["Smart TV"]),
            ],
        };
        assert!(validate_categories(&file).is_ok());
    }

    #[test]
    fn find_matches_by_slug() {
        let file = CategoriesFile {
            categories: vec![category("Telefonia", &["Celular"])],
        };
        assert!(file.find("telefonia").is_some());
        assert!(file.find("mobiliario").is_none());
    }

    #[test]
    fn load_categories_from_real_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("categories.yaml");
        assert!(
            path.exists(),
            "categories.yaml missing at {path:?} — required for this test"
        );
        let result = load_categories(&path);
        assert!(result.is_ok(), "failed to load categories.yaml: {result:?}");
        let file = result.unwrap();
        assert!(!file.categories.is_empty());
    }
}
