//! Naming rules for namespaced type names.
//!
//! Type names are written with `\` between namespace segments. A name written
//! with a leading separator (`\App\Cache`) is fully qualified; the catalog
//! stores names without it (`App\Cache`).

use std::path::Path;

/// Separator between namespace segments.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Separator as a string slice, for joining.
pub const NAMESPACE_DELIMITER: &str = "\\";

/// Returns `true` if the name is written fully qualified (leading separator).
pub fn is_fully_qualified(name: &str) -> bool {
    name.starts_with(NAMESPACE_SEPARATOR)
}

/// Strip exactly one leading namespace separator.
pub fn strip_leading_separator(name: &str) -> &str {
    name.strip_prefix(NAMESPACE_SEPARATOR).unwrap_or(name)
}

/// Compare two type names the way the host language does: case-insensitively,
/// ignoring a leading separator on either side.
pub fn same_type_name(left: &str, right: &str) -> bool {
    strip_leading_separator(left).eq_ignore_ascii_case(strip_leading_separator(right))
}

/// Render a path the way it is stored in signatures: `/` separators, no
/// platform prefix juggling.
pub fn portable_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        raw.into_owned()
    } else {
        raw.replace(std::path::MAIN_SEPARATOR, "/")
    }
}
