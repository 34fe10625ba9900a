//! Route handlers organized by resource

pub mod health;
pub mod categories;
pub mod products;
pub mod tags;

use crate::models::{Id, IdList};

/// Turn an optional request id list into an `IdList`.
pub(crate) fn id_list(ids: Option<Vec<Id>>) -> Option<IdList> {
    ids.map(IdList::new)
}
