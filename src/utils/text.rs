/// Capitalizes the first character and lowercases the rest.
/// Applied to first/last names and post titles before they are written.
pub fn normalize_name(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
