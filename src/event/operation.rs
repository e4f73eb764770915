use serde::{Deserialize, Serialize};

/// The kind of data operation carried by a CQ event.
///
/// The same enum describes both the base operation (the mutation applied to
/// the cache entry) and the query operation (how that mutation changed the
/// query's result set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Create,
    Update,
    Destroy,
    Invalidate,
    RegionClear,
    RegionInvalidate,
    RegionDestroy,
    Marker,
}

impl Operation {
    pub fn is_create(&self) -> bool {
        matches!(self, Operation::Create)
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Operation::Update)
    }

    pub fn is_destroy(&self) -> bool {
        matches!(self, Operation::Destroy)
    }

    pub fn is_invalidate(&self) -> bool {
        matches!(self, Operation::Invalidate)
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, Operation::RegionClear)
    }

    pub fn is_region_invalidate(&self) -> bool {
        matches!(self, Operation::RegionInvalidate)
    }

    /// True for operations that affect a whole region rather than one entry.
    pub fn is_region(&self) -> bool {
        matches!(
            self,
            Operation::RegionClear | Operation::RegionInvalidate | Operation::RegionDestroy
        )
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Destroy => "DESTROY",
            Operation::Invalidate => "INVALIDATE",
            Operation::RegionClear => "REGION_CLEAR",
            Operation::RegionInvalidate => "REGION_INVALIDATE",
            Operation::RegionDestroy => "REGION_DESTROY",
            Operation::Marker => "MARKER",
        };
        write!(f, "{}", name)
    }
}
