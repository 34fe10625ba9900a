//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod category;
pub mod product;
pub mod tag;
pub mod ids;

pub use validation::ValidationError;
pub use category::{CategoryName, CategoryPatch, NewCategory};
pub use product::{NewProduct, Price, ProductName, ProductPatch, Stock};
pub use tag::{NewTag, TagName, TagPatch};
pub use ids::{AssociationDiff, IdList};

/// Primary key type shared by every catalog table (`SERIAL`)
pub type Id = i32;

/// Maximum length for category, product and tag names
pub(crate) const MAX_NAME_LEN: usize = 255;

/// Trim and validate a display name.
pub(crate) fn clean_name(field: &'static str, s: &str) -> Result<String, ValidationError> {
    let trimmed = s.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_NAME_LEN,
        });
    }

    Ok(trimmed.to_owned())
}
