//! `scaffold names` command.

use crate::naming::{NameVariantSet, ProjectName};

/// Execute the `names` command.
///
/// # Errors
///
/// Returns the validation error if the name is unusable even after
/// sanitization.
pub fn run(raw: &str) -> Result<(), String> {
    let name = ProjectName::parse(raw).map_err(|e| e.to_string())?;
    println!("{}", format_names(&name, &NameVariantSet::derive(&name)));
    Ok(())
}

/// Formats a name and its variants as an aligned table.
#[must_use]
pub fn format_names(name: &ProjectName, variants: &NameVariantSet) -> String {
    let mut lines = vec![format!("name    {name}")];
    for (style, spelling) in variants.iter() {
        lines.push(format!("{:<7} {spelling}", style.label()));
    }
    lines.join("\n")
}
