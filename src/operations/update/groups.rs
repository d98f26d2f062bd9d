//! Group expansion

use crate::definition::Definition;
use crate::error::Result;

/// Names of every gem in `groups`, appended group by group
///
/// Unknown groups are reported by the definition and passed through.
pub fn expand(groups: &[String], definition: &Definition) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for group in groups {
        names.extend(definition.specs_for_groups(std::slice::from_ref(group))?);
    }
    Ok(names)
}
