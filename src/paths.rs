use std::path::PathBuf;

use chrono::NaiveDate;

pub const DEFAULT_INPUT: &str = "~/Downloads/eksport.csv";
const DATE_PLACEHOLDER: &str = "{date}";

/// Expand a leading `~` to the home directory. Paths are left alone when no
/// home directory is known.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path),
    };
    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

pub fn resolve_input(path: &str) -> PathBuf {
    expand_home(path)
}

/// Resolve where the converted file goes, `None` meaning standard output.
///
/// `{date}` is replaced by `today` as `YYYYMMDD` so repeated exports do not
/// overwrite each other.
pub fn resolve_output(path: Option<&str>, today: NaiveDate) -> Option<PathBuf> {
    match path {
        None | Some("") | Some("-") => None,
        Some(p) => {
            let stamped = p.replace(DATE_PLACEHOLDER, &today.format("%Y%m%d").to_string());
            Some(expand_home(&stamped))
        }
    }
}
