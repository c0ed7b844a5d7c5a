//! Shareable metadata for `just_test_core::vocab` registries.
//!
//! Each vocabulary (severities, assertion operators) is a `const` table of [`VocabInfo`] entries keyed by a stable id.
//!
//! ## Notes
//! - These types are `Copy`-friendly so registries can live in `const` tables.
//! - `description` is mandatory to keep docs and diagnostics consistent.

/// Shared metadata shape for registry-first vocabulary items.
///
/// - stable identity (`id`)
/// - accepted spellings (`canonical` + `aliases`)
/// - documentation (`description`)
#[derive(Debug, Clone, Copy)]
pub struct VocabInfo<Id> {
    pub id: Id,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

impl<Id: Copy + PartialEq> VocabInfo<Id> {
    /// Check whether `s` is the canonical spelling or one of the aliases.
    pub fn is_spelled(&self, s: &str) -> bool {
        self.canonical == s || self.aliases.contains(&s)
    }
}

/// Lookup an id by spelling (canonical first, then aliases).
///
/// ## Notes
/// - Matching is **case-sensitive**.
pub fn lookup<Id: Copy + PartialEq>(table: &[VocabInfo<Id>], s: &str) -> Option<Id> {
    if let Some(item) = table.iter().find(|item| item.canonical == s) {
        return Some(item.id);
    }
    table.iter().find(|item| item.aliases.contains(&s)).map(|item| item.id)
}

/// Find the registry entry for `id`.
pub fn find<Id: Copy + PartialEq>(table: &'static [VocabInfo<Id>], id: Id) -> Option<&'static VocabInfo<Id>> {
    table.iter().find(|item| item.id == id)
}
