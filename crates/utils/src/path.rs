use std::{borrow::Cow, path::Path};

pub struct PathTools;

impl PathTools {
    /// Separator of native paths on this platform.
    pub const DIRECTORY_SEPARATOR_CHAR: char = std::path::MAIN_SEPARATOR;

    /// Scores how much trailing structure two native paths share.
    ///
    /// See [`PathTools::reverse_match_score_with`].
    pub fn reverse_match_score(path1: &str, path2: &str) -> usize {
        PathTools::reverse_match_score_with(path1, path2, Self::DIRECTORY_SEPARATOR_CHAR)
    }

    /// Splits both paths on `separator` and walks the components from the
    /// end. Every identical pair adds its character length to the score, the
    /// first differing pair (or either side running out) stops the walk.
    ///
    /// Empty components produced by leading or trailing separators take part
    /// in the comparison, so they can stop the walk but never add to it:
    ///
    /// ```text
    /// /a/b/c12/e34    vs  /a/b/X/c12/e34  =>  6 (e34 + c12)
    /// /b              vs  /b/             =>  0 ("b" vs "")
    /// ```
    pub fn reverse_match_score_with(path1: &str, path2: &str, separator: char) -> usize {
        path1
            .rsplit(separator)
            .zip(path2.rsplit(separator))
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.chars().count())
            .sum()
    }

    /// Native path as a string for scoring and logging.
    pub fn lossy(path: &Path) -> Cow<'_, str> {
        path.to_string_lossy()
    }

    /// True if `path` is `ancestor` or lies below it, comparing whole
    /// components only.
    pub fn is_within(path: &Path, ancestor: &Path) -> bool {
        !ancestor.as_os_str().is_empty() && path.starts_with(ancestor)
    }
}
