//! Tag name validation and write inputs

use super::{clean_name, IdList, ValidationError};

/// Validated tag name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName(String);

impl TagName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        clean_name("tag_name", s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Input for creating a tag with its initial product set
#[derive(Debug, Clone)]
pub struct NewTag {
    pub name: TagName,
    pub product_ids: IdList,
}

/// Partial tag update; `product_ids: Some(_)` replaces the whole product set
#[derive(Debug, Clone, Default)]
pub struct TagPatch {
    pub name: Option<TagName>,
    pub product_ids: Option<IdList>,
}
