//! Category name validation and write inputs

use super::{clean_name, ValidationError};

/// Validated category name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a new category name.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 255 characters
    ///
    /// # Example
    /// ```
    /// use catalog_server::models::CategoryName;
    ///
    /// assert!(CategoryName::new("Shirts").is_ok());
    /// assert!(CategoryName::new("  ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        clean_name("category_name", s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Input for creating a category
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: CategoryName,
}

/// Partial category update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<CategoryName>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_whitespace() {
        let name = CategoryName::new("  Books ").unwrap();
        assert_eq!(name.as_str(), "Books");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            CategoryName::new("").unwrap_err(),
            ValidationError::Empty {
                field: "category_name"
            }
        ));
    }

    #[test]
    fn max_length() {
        assert!(CategoryName::new(&"a".repeat(255)).is_ok());

        let err = CategoryName::new(&"a".repeat(256)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 255, .. }));
    }
}
