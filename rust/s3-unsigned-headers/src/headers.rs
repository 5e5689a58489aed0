//! Header name sets and the per-request table of stripped headers.

use aws_smithy_runtime_api::http::{Headers, HttpError};

/// Canonical form of a header name: surrounding whitespace removed and
/// ASCII-lowercased, which is how HTTP/2 and the `http` crate spell them.
pub fn canonical_header_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// An ordered set of canonical header names.
///
/// Names are canonicalized on the way in, so `"Accept-Encoding"` and
/// `"accept-encoding"` collapse into one entry. Empty names are dropped and
/// the first occurrence decides the position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<String>", into = "Vec<String>")
)]
pub struct HeaderNames(Vec<String>);

impl HeaderNames {
    /// Build a set from any list of header names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut canonical: Vec<String> = Vec::new();
        for name in names {
            let name = canonical_header_name(name.as_ref());
            if !name.is_empty() && !canonical.contains(&name) {
                canonical.push(name);
            }
        }
        Self(canonical)
    }

    /// Whether the given name (in any case) is part of the set.
    pub fn contains(&self, name: &str) -> bool {
        let name = canonical_header_name(name);
        self.0.contains(&name)
    }

    /// Iterate over the canonical names in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of names in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no names are configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The canonical names as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: AsRef<str>> FromIterator<S> for HeaderNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<String>> for HeaderNames {
    fn from(names: Vec<String>) -> Self {
        Self::new(names)
    }
}

impl From<&[&str]> for HeaderNames {
    fn from(names: &[&str]) -> Self {
        Self::new(names)
    }
}

impl<const N: usize> From<[&str; N]> for HeaderNames {
    fn from(names: [&str; N]) -> Self {
        Self::new(names)
    }
}

impl From<HeaderNames> for Vec<String> {
    fn from(names: HeaderNames) -> Self {
        names.0
    }
}

/// Header values lifted off a single request before it was signed.
///
/// One table exists per signing attempt and lives only for the duration of
/// that call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrippedHeaders(Vec<(String, Vec<String>)>);

impl StrippedHeaders {
    /// Remove every header listed in `names` from `headers`, keeping all of
    /// its values. Names that are not present are skipped.
    pub fn strip(names: &HeaderNames, headers: &mut Headers) -> Self {
        let mut stripped = Vec::new();
        for name in names.iter() {
            let values: Vec<String> = headers.get_all(name).map(str::to_owned).collect();
            if values.is_empty() {
                continue;
            }
            headers.remove(name);
            stripped.push((name.to_owned(), values));
        }
        Self(stripped)
    }

    /// Put the stripped headers back. Whatever sits under the same name at
    /// this point is replaced, so the stripped values always go out.
    pub fn restore(self, headers: &mut Headers) -> Result<(), HttpError> {
        for (name, values) in self.0 {
            headers.remove(name.as_str());
            for value in values {
                headers.try_append(name.clone(), value)?;
            }
        }
        Ok(())
    }

    /// Names of the headers held in this table.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    /// Values stripped for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        let name = canonical_header_name(name);
        self.0
            .iter()
            .find(|(stripped, _)| *stripped == name)
            .map(|(_, values)| values.as_slice())
    }

    /// True when nothing was stripped.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
