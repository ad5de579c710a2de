//! Serde helpers for keeping the persisted block shape compact

/// Skip boolean style flags that are unset, matching how the editor stores text leaves
pub fn is_false(value: &bool) -> bool {
    !*value
}
