use std::path::Path;

/// Drop the final extension from a file name: `"a.b.mp3"` becomes `"a.b"`.
///
/// Leading-dot names without another dot (`".mp3"`) are kept as-is, like
/// `Path::file_stem`.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) if i > 0 => &name[..i],
        _ => name,
    }
}

/// Lowercased extension of `path`, without the dot.
pub fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Normalise configured extensions: trim, strip a leading dot, lowercase.
pub fn normalize_extensions(exts: &[String]) -> Vec<String> {
    exts.iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}
