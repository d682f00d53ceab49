//! Output filename derivation.

/// `"Mary Jane", "Watson"` becomes `mary-jane-watson`.
///
/// Only lowercasing and space replacement are applied. Accents, punctuation
/// and duplicate names are left alone, so two contacts with the same name
/// map to the same file.
pub fn derive_filename(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name)
        .to_lowercase()
        .replace(' ', "-")
}
