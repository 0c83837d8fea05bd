pub const NAME_WIDTH: usize = 43;
pub const COLUMN_WIDTH: usize = 8;

const NAME_KEEP: usize = NAME_WIDTH - 4;
const ELLIPSIS: &str = "..";

/// Shortens an author identity to fit the name column.
pub fn trim_name(name: &str) -> String {
    match name.char_indices().nth(NAME_KEEP) {
        Some((cut, _)) => format!("{}{}", &name[..cut], ELLIPSIS),
        None => name.to_string(),
    }
}
