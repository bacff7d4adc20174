//! Keeping hand-written code across regeneration.

use std::collections::HashSet;

/// Everything after this line belongs to the user and survives regeneration.
pub const USER_CODE_MARKER: &str = "// ---- user code ----";

/// Joins freshly generated code with the user section of `cached`.
pub fn merge_user_code(generated: &str, cached: &str) -> String {
    match extract_user_code(cached) {
        Some(user) if cached != generated => format!("{generated}\n{USER_CODE_MARKER}{user}"),
        _ => format!("{generated}\n{USER_CODE_MARKER}\n"),
    }
}

/// Text after the first marker, or `None` when there is no marker or nothing after it.
pub fn extract_user_code(code: &str) -> Option<&str> {
    let (_, user) = code.split_once(USER_CODE_MARKER)?;
    (!user.is_empty()).then_some(user)
}

/// Appends every non-blank line of `new` that `base` does not already contain, then
/// squeezes runs of blank lines down to one.
pub fn append_missing_lines(base: &str, new: &str) -> String {
    if new.trim().is_empty() || new == base {
        return base.to_string();
    }
    let base_lines: Vec<&str> = base.lines().collect();
    let seen: HashSet<&str> = base_lines.iter().copied().collect();
    let additions = new
        .lines()
        .filter(|l| !l.trim().is_empty() && !seen.contains(l));

    let mut out: Vec<&str> = Vec::with_capacity(base_lines.len());
    for line in base_lines.iter().copied().chain(additions) {
        let blank = line.trim().is_empty();
        if blank && out.last().is_some_and(|l| l.trim().is_empty()) {
            continue;
        }
        out.push(line);
    }
    out.join("\n")
}
