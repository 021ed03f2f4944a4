//! Bulk upload — decide which category each file in a multi-file upload
//! lands in.
//!
//! Files are handled in upload order. A filename that contains a category's
//! name (plural or singular, case-insensitive) goes to that category; a later
//! match for the same category overrides the earlier file. A filename that
//! matches nothing takes the first category, in fixed order, that has no file
//! yet. Once all four are taken, non-matching files are skipped.

use crate::deck::Category;
use tracing::info;

/// How one file of a bulk upload was placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Filename named the category.
    Matched(Category),
    /// Filename named nothing; took the first unassigned category.
    Default(Category),
    /// Filename named a category another file in this batch already held.
    Override { category: Category, replaced: String },
    /// Filename named nothing and every category was taken.
    Skipped,
}

impl Placement {
    pub fn category(&self) -> Option<Category> {
        match self {
            Placement::Matched(c) | Placement::Default(c) => Some(*c),
            Placement::Override { category, .. } => Some(*category),
            Placement::Skipped => None,
        }
    }
}

/// One file's outcome in a bulk upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub name: String,
    pub placement: Placement,
    /// False once a later file in the batch overrode this one.
    pub active: bool,
}

/// Category a filename names, if any. First match in enumeration order wins.
pub fn match_category(filename: &str) -> Option<Category> {
    let lower = filename.to_lowercase();
    Category::ALL
        .into_iter()
        .find(|c| lower.contains(c.as_str()) || lower.contains(c.singular()))
}

/// Assign every filename to a category (or skip it).
pub fn assign_files<S: AsRef<str>>(names: &[S]) -> Vec<Assignment> {
    // Index into the result list of the file currently holding each category.
    let mut holders: [Option<usize>; 4] = [None; 4];
    let mut out: Vec<Assignment> = Vec::with_capacity(names.len());

    for name in names {
        let name = name.as_ref();
        let placement = match match_category(name) {
            Some(category) => match holders[category.index()] {
                Some(prev) => {
                    out[prev].active = false;
                    Placement::Override {
                        category,
                        replaced: out[prev].name.clone(),
                    }
                }
                None => Placement::Matched(category),
            },
            None => match Category::ALL.into_iter().find(|c| holders[c.index()].is_none()) {
                Some(category) => Placement::Default(category),
                None => Placement::Skipped,
            },
        };

        if let Some(category) = placement.category() {
            holders[category.index()] = Some(out.len());
        }
        info!(file = name, ?placement, "bulk assignment");
        out.push(Assignment {
            name: name.to_string(),
            active: placement != Placement::Skipped,
            placement,
        });
    }

    out
}
