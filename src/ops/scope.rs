use std::collections::BTreeSet;

use crate::model::{Report, Task, ViewerScope};

/// A record with an owner column the view filter can scope on.
pub trait Owned {
    fn owner(&self) -> &str;
}

impl Owned for Task {
    fn owner(&self) -> &str {
        &self.name_of_staff
    }
}

impl Owned for Report {
    fn owner(&self) -> &str {
        &self.author_name
    }
}

/// Result of scoping a collection to a viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoped<'a, T> {
    /// The rows this viewer may see, in collection order.
    pub visible: Vec<&'a T>,
    /// Distinct owner names present, sorted — feeds the admin-only owner
    /// filter control. Empty for scoped viewers: the control is not offered
    /// to them and other staff names are not disclosed.
    pub distinct_owners: BTreeSet<String>,
}

/// Narrow a full fetched collection to what the viewer may see.
///
/// A privileged viewer sees everything; a scoped viewer sees exactly the
/// rows whose owner column equals their own identity, and nothing else,
/// not even transiently.
pub fn scope<'a, T: Owned>(collection: &'a [T], viewer: &ViewerScope) -> Scoped<'a, T> {
    if viewer.privileged {
        Scoped {
            visible: collection.iter().collect(),
            distinct_owners: collection.iter().map(|r| r.owner().to_string()).collect(),
        }
    } else {
        Scoped {
            visible: collection
                .iter()
                .filter(|r| r.owner() == viewer.name)
                .collect(),
            distinct_owners: BTreeSet::new(),
        }
    }
}

/// The admin-only owner refinement over an already-scoped row set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OwnerFilter {
    /// The "All Names" sentinel — no refinement.
    #[default]
    All,
    Name(String),
}

impl OwnerFilter {
    pub fn label(&self) -> &str {
        match self {
            OwnerFilter::All => "All Names",
            OwnerFilter::Name(name) => name,
        }
    }
}

/// Re-apply the owner-equality predicate over an already-visible set.
/// Pure, idempotent, order-preserving.
pub fn refine<'a, T: Owned>(visible: &[&'a T], filter: &OwnerFilter) -> Vec<&'a T> {
    match filter {
        OwnerFilter::All => visible.to_vec(),
        OwnerFilter::Name(name) => visible
            .iter()
            .copied()
            .filter(|r| r.owner() == name)
            .collect(),
    }
}
