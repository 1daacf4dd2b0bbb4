pub mod audit;
pub mod feedback;
pub mod inventory;
pub mod medicines;
pub mod pharmacies;
pub mod prescriptions;
pub mod users;

/// `ILIKE` pattern matching `term` anywhere, with `%`, `_` and `\` taken literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
