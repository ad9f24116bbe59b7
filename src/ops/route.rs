use crate::model::ViewerScope;

/// Where an identity lands right after login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTarget {
    /// Full reports view (administrator only).
    Reports,
    /// Personal tasks view (everyone else).
    Tasks,
}

/// Post-login routing: a two-way branch on privilege, not an access list —
/// every non-administrator identity is treated uniformly.
pub fn route(viewer: &ViewerScope) -> ViewTarget {
    if viewer.privileged {
        ViewTarget::Reports
    } else {
        ViewTarget::Tasks
    }
}
