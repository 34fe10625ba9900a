//! Identifier lists and association set differences
//!
//! Association writes never wipe and recreate the join rows. The requested
//! set is compared with the stored one and only the difference is written.

use std::collections::BTreeSet;

use super::Id;

/// De-duplicated list of identifiers, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdList(Vec<Id>);

impl IdList {
    /// Build a list, dropping repeated identifiers.
    ///
    /// # Example
    /// ```
    /// use catalog_server::models::IdList;
    ///
    /// let ids = IdList::new(vec![3, 1, 3, 2, 1]);
    /// assert_eq!(ids.as_slice(), &[3, 1, 2]);
    /// ```
    pub fn new(ids: Vec<Id>) -> Self {
        let mut seen = BTreeSet::new();
        Self(ids.into_iter().filter(|id| seen.insert(*id)).collect())
    }

    pub fn as_slice(&self) -> &[Id] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.0.contains(&id)
    }

    /// Identifiers from this list that are absent from `found`.
    pub fn missing_from(&self, found: &BTreeSet<Id>) -> Vec<Id> {
        self.0.iter().copied().filter(|id| !found.contains(id)).collect()
    }
}

impl From<Vec<Id>> for IdList {
    fn from(ids: Vec<Id>) -> Self {
        Self::new(ids)
    }
}

/// Rows to insert and rows to delete to turn one association set into another
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationDiff {
    /// Requested but not currently stored (ascending)
    pub to_add: Vec<Id>,
    /// Currently stored but not requested (ascending)
    pub to_remove: Vec<Id>,
}

impl AssociationDiff {
    pub fn between(current: &[Id], requested: &IdList) -> Self {
        let current: BTreeSet<Id> = current.iter().copied().collect();
        let requested: BTreeSet<Id> = requested.as_slice().iter().copied().collect();

        Self {
            to_add: requested.difference(&current).copied().collect(),
            to_remove: current.difference(&requested).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupes_preserving_order() {
        let ids = IdList::new(vec![5, 2, 5, 5, 9, 2]);
        assert_eq!(ids.as_slice(), &[5, 2, 9]);
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn missing_ids() {
        let ids = IdList::new(vec![1, 2, 3]);
        let found: BTreeSet<Id> = [2].into_iter().collect();
        assert_eq!(ids.missing_from(&found), vec![1, 3]);
    }

    #[test]
    fn diff_add_and_remove() {
        let diff = AssociationDiff::between(&[1, 2, 3], &IdList::new(vec![3, 4]));
        assert_eq!(diff.to_add, vec![4]);
        assert_eq!(diff.to_remove, vec![1, 2]);
    }

    #[test]
    fn diff_of_equal_sets_is_empty() {
        let diff = AssociationDiff::between(&[2, 1], &IdList::new(vec![1, 2]));
        assert!(diff.is_empty());
    }

    #[test]
    fn empty_request_clears_everything() {
        let diff = AssociationDiff::between(&[7, 8], &IdList::default());
        assert!(diff.to_add.is_empty());
        assert_eq!(diff.to_remove, vec![7, 8]);
    }
}
