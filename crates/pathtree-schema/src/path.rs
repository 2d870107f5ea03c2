use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

pub const PATH_SEPARATOR: char = '.';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("path must not be empty")]
    Empty,
    #[error("path '{path}' has an empty segment at token {index}")]
    EmptySegment { path: String, index: usize },
    #[error("invalid path token '{token}': must be non-empty and must not contain '.'")]
    InvalidToken { token: String },
}

/// Dot-delimited address into an object tree, e.g. `root.plan.p1.commitment.c1`.
///
/// Tokens alternate kind and key for keyed levels; singleton levels contribute
/// their kind alone. Every token is non-empty.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreePath(String);

impl TreePath {
    pub fn new(value: impl Into<String>) -> Result<Self, PathError> {
        let value = value.into();
        if value.is_empty() {
            return Err(PathError::Empty);
        }
        if let Some(index) = value.split(PATH_SEPARATOR).position(str::is_empty) {
            return Err(PathError::EmptySegment { path: value, index });
        }
        Ok(TreePath(value))
    }

    /// A path made of exactly one token.
    pub fn token(token: &str) -> Result<Self, PathError> {
        if !is_valid_token(token) {
            return Err(PathError::InvalidToken {
                token: token.to_string(),
            });
        }
        Ok(TreePath(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn tokens(&self) -> std::str::Split<'_, char> {
        self.0.split(PATH_SEPARATOR)
    }

    pub fn token_count(&self) -> usize {
        self.tokens().count()
    }

    pub fn last_token(&self) -> &str {
        match self.0.rsplit_once(PATH_SEPARATOR) {
            Some((_, last)) => last,
            None => &self.0,
        }
    }

    /// The containing path: this path minus its final token. `None` for a
    /// single-token path, which lives directly at the tree root.
    pub fn parent(&self) -> Option<TreePath> {
        self.0
            .rsplit_once(PATH_SEPARATOR)
            .map(|(parent, _)| TreePath(parent.to_string()))
    }

    pub fn join(&self, token: &str) -> Result<TreePath, PathError> {
        if !is_valid_token(token) {
            return Err(PathError::InvalidToken {
                token: token.to_string(),
            });
        }
        Ok(TreePath(format!("{}{PATH_SEPARATOR}{token}", self.0)))
    }
}

impl fmt::Debug for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for TreePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for TreePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TreePath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        TreePath::new(s).map_err(serde::de::Error::custom)
    }
}

impl FromStr for TreePath {
    type Err = PathError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TreePath::new(s)
    }
}

fn is_valid_token(token: &str) -> bool {
    !token.is_empty() && !token.contains(PATH_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_validation() {
        assert!(TreePath::new("root.plan.p1").is_ok());
        assert!(TreePath::new("root").is_ok());
        assert_eq!(TreePath::new(""), Err(PathError::Empty));
        assert_eq!(
            TreePath::new("root..p1"),
            Err(PathError::EmptySegment {
                path: "root..p1".into(),
                index: 1
            })
        );
        assert!(TreePath::new("root.plan.").is_err());
        assert!(TreePath::new(".root").is_err());
    }

    #[test]
    fn parent_and_last_token() {
        let path = TreePath::new("root.plan.p1").unwrap();
        assert_eq!(path.token_count(), 3);
        assert_eq!(path.last_token(), "p1");
        assert_eq!(path.parent().unwrap().as_str(), "root.plan");
        assert_eq!(TreePath::new("root").unwrap().parent(), None);
        assert_eq!(TreePath::new("root").unwrap().last_token(), "root");
    }

    #[test]
    fn join_rejects_separator() {
        let base = TreePath::new("root.plan").unwrap();
        assert_eq!(base.join("p1").unwrap().as_str(), "root.plan.p1");
        assert!(base.join("p1.x").is_err());
        assert!(base.join("").is_err());
        assert!(TreePath::token("a.b").is_err());
    }

    #[test]
    fn serde_as_plain_string() {
        let path: TreePath = serde_json::from_str("\"root.plan.p1\"").unwrap();
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"root.plan.p1\"");
        assert!(serde_json::from_str::<TreePath>("\"root..p1\"").is_err());
    }
}
