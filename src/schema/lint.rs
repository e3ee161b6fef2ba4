//! Advisory consistency checks on already-validated values
//!
//! Validation deliberately accepts duplicate block ids and edit id sets that
//! do not line up with `updatedBlocks`. These checks report such cases as
//! warnings for callers that want referential consistency.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::core::{EditResult, FieldPath, Template};
use crate::schema::validator::Normalized;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LintKind {
    DuplicateBlockId,
    UnknownChangedId,
    UnknownAddedId,
    RemovedIdStillPresent,
    OverlappingIdSets,
}

impl LintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LintKind::DuplicateBlockId => "duplicate_block_id",
            LintKind::UnknownChangedId => "unknown_changed_id",
            LintKind::UnknownAddedId => "unknown_added_id",
            LintKind::RemovedIdStillPresent => "removed_id_still_present",
            LintKind::OverlappingIdSets => "overlapping_id_sets",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintWarning {
    pub path: FieldPath,
    pub kind: LintKind,
    pub message: String,
}

impl std::fmt::Display for LintWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

pub fn lint(value: &Normalized) -> Vec<LintWarning> {
    match value {
        Normalized::Block(_) => Vec::new(),
        Normalized::Template(template) => lint_template(template, &FieldPath::root()),
        Normalized::Suite(templates) => templates
            .iter()
            .enumerate()
            .flat_map(|(i, t)| lint_template(t, &FieldPath::root().index(i)))
            .collect(),
        Normalized::Edit(edit) => lint_edit(edit),
    }
}

pub fn lint_template(template: &Template, base: &FieldPath) -> Vec<LintWarning> {
    duplicate_ids(template.block_ids(), &base.key("blocks"))
}

pub fn lint_edit(edit: &EditResult) -> Vec<LintWarning> {
    let mut warnings = duplicate_ids(
        edit.updated_blocks.iter().map(|b| b.id.as_str()),
        &FieldPath::root().key("updatedBlocks"),
    );
    if edit.is_noop() {
        return warnings;
    }

    for (i, id) in edit.changed_block_ids.iter().enumerate() {
        if edit.updated_block(id).is_none() {
            warnings.push(LintWarning {
                path: FieldPath::root().key("changedBlockIds").index(i),
                kind: LintKind::UnknownChangedId,
                message: format!("changed block '{}' is not in updatedBlocks", id),
            });
        }
    }

    for (i, id) in edit.added_block_ids.iter().enumerate() {
        if edit.updated_block(id).is_none() {
            warnings.push(LintWarning {
                path: FieldPath::root().key("addedBlockIds").index(i),
                kind: LintKind::UnknownAddedId,
                message: format!("added block '{}' is not in updatedBlocks", id),
            });
        }
    }

    for (i, id) in edit.removed_block_ids.iter().enumerate() {
        if edit.updated_block(id).is_some() {
            warnings.push(LintWarning {
                path: FieldPath::root().key("removedBlockIds").index(i),
                kind: LintKind::RemovedIdStillPresent,
                message: format!("removed block '{}' is still in updatedBlocks", id),
            });
        }
    }

    // First set each id appears in, to report later appearances once
    let sets = [
        ("changedBlockIds", &edit.changed_block_ids),
        ("addedBlockIds", &edit.added_block_ids),
        ("removedBlockIds", &edit.removed_block_ids),
    ];
    let mut first_seen: HashMap<&str, &str> = HashMap::new();
    for (set_name, ids) in sets {
        let mut reported_here = HashSet::new();
        for (i, id) in ids.iter().enumerate() {
            match first_seen.get(id.as_str()) {
                Some(&other) if other != set_name => {
                    if reported_here.insert(id.as_str()) {
                        warnings.push(LintWarning {
                            path: FieldPath::root().key(set_name).index(i),
                            kind: LintKind::OverlappingIdSets,
                            message: format!("block '{}' is also listed in {}", id, other),
                        });
                    }
                }
                Some(_) => {}
                None => {
                    first_seen.insert(id.as_str(), set_name);
                }
            }
        }
    }

    warnings
}

fn duplicate_ids<'a>(ids: impl Iterator<Item = &'a str>, base: &FieldPath) -> Vec<LintWarning> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut warnings = Vec::new();

    for (i, id) in ids.enumerate() {
        match seen.get(id) {
            Some(first) => warnings.push(LintWarning {
                path: base.index(i).key("id"),
                kind: LintKind::DuplicateBlockId,
                message: format!("block id '{}' already used by {}[{}]", id, base, first),
            }),
            None => {
                seen.insert(id, i);
            }
        }
    }

    warnings
}
