use std::fmt::{Display, Formatter};
use url::Url;

/// Resolve an asset `reference` against the directory `base_path`.
///
/// A `/`-rooted reference is project-root relative: the leading slash is stripped and the rest is
/// returned as-is. Otherwise `.` segments are skipped, `..` pops the last retained segment (popping
/// above the project root is absorbed) and empty segments are dropped.
///
/// See tests module for examples.
pub fn resolve(base_path: &str, reference: &str) -> String {
    if let Some(rooted) = reference.strip_prefix('/') {
        return rooted.to_string();
    }
    let mut segments: Vec<&str> = base_path.split('/').filter(|s| !s.is_empty()).collect();
    for part in reference.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(part),
        }
    }
    let res = segments.join("/");
    tracing::trace!("resolve: '{}' against '{}' -> '{}'", reference, base_path, res);
    res
}

/// Canonical form of a user-supplied project path: no leading slash, no empty, `.` or `..`
/// segments.
pub fn normalize(path: &str) -> String {
    resolve("", path.trim_start_matches('/'))
}

/// True for references the preview must never try to inline: anything with a URL scheme
/// (`https:`, `data:`, ...) and protocol-relative `//host/...` references.
pub fn is_external_url(reference: &str) -> bool {
    reference.starts_with("//") || Url::parse(reference).is_ok()
}

/// Longest directory prefix shared by every path (no trailing slash). Empty when the paths have
/// no common folder or when `paths` is empty.
pub fn common_dir<'a, I>(paths: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut common: Option<Vec<&str>> = None;
    for path in paths {
        let dir: Vec<&str> = ProjectPath::new(path)
            .dir()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        common = Some(match common {
            None => dir,
            Some(prev) => prev
                .iter()
                .zip(dir.iter())
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| *a)
                .collect(),
        });
    }
    common.map(|parts| parts.join("/")).unwrap_or_default()
}

/// Join a directory and a child name, skipping the separator at the top level.
pub fn join(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Borrowed view over a slash-separated project path.
///
/// Project paths always name a file or a folder relative to the project root; there is no leading
/// slash and no anchor. A trailing slash marks a folder with an empty file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectPath<'a> {
    pub path: &'a str,
    /// Index of the last '/' separating the directory from the file name
    dir_sep: Option<usize>,
    /// Index of '.' separating the file stem from its extension
    ext_sep: Option<usize>,
}

impl<'a> ProjectPath<'a> {
    pub fn new(path: &'a str) -> ProjectPath<'a> {
        let dir_sep = path.rfind('/');
        let name_start = dir_sep.map(|sep| sep + 1).unwrap_or(0);
        let ext_sep = path[name_start..]
            .rfind('.')
            // Don't count hidden files as extension markers
            .filter(|dot_idx| *dot_idx > 0)
            .map(|dot_idx| dot_idx + name_start);
        ProjectPath {
            path,
            dir_sep,
            ext_sep,
        }
    }

    /// Directory part without a trailing slash ("" at the top level).
    pub fn dir(&self) -> &'a str {
        &self.path[0..self.dir_sep.unwrap_or(0)]
    }

    /// Directory part including its trailing slash, suitable for prefix matching.
    pub fn dir_prefix(&self) -> &'a str {
        &self.path[0..self.dir_sep.map(|idx| idx + 1).unwrap_or(0)]
    }

    pub fn name(&self) -> &'a str {
        &self.path[self.dir_sep.map(|idx| idx + 1).unwrap_or(0)..]
    }

    pub fn stem(&self) -> &'a str {
        let start_idx = self.dir_sep.map(|idx| idx + 1).unwrap_or(0);
        &self.path[start_idx..self.ext_sep.unwrap_or(self.path.len())]
    }

    /// Extension as written (case preserved, no dot).
    pub fn ext(&self) -> &'a str {
        self.ext_sep
            .map(|idx| &self.path[idx + 1..])
            .unwrap_or("")
    }

    pub fn has_ext(&self, ext: &str) -> bool {
        self.ext().eq_ignore_ascii_case(ext)
    }

    pub fn is_html(&self) -> bool {
        self.has_ext("html")
    }

    /// Non-empty path segments from the top level down to the name.
    pub fn segments(&self) -> impl Iterator<Item = &'a str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }

    /// Resolve `reference` relative to the directory holding this path.
    pub fn resolve<E: AsRef<str>>(&self, reference: E) -> String {
        resolve(self.dir_prefix(), reference.as_ref())
    }
}

impl<'a, T: AsRef<str> + ?Sized> From<&'a T> for ProjectPath<'a> {
    fn from(s: &'a T) -> ProjectPath<'a> {
        ProjectPath::new(s.as_ref())
    }
}

impl<'a> AsRef<str> for ProjectPath<'a> {
    fn as_ref(&self) -> &str {
        self.path
    }
}

impl<'a> Display for ProjectPath<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}
