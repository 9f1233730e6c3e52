use std::fmt;

/// A class name as written in markup, parsed once from its sigil form.
///
/// - `title` is a plain, global class name
/// - `@title` / `@_title` are scoped to the stylesheet being rendered
/// - `/lib/card@title` is scoped to another stylesheet
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassNameToken {
    Plain(String),
    ScopedLocal(String),
    ScopedRemote { path: String, name: String },
}

impl ClassNameToken {
    pub fn parse(raw: &str) -> Self {
        if let Some(name) = raw.strip_prefix('@') {
            if !name.is_empty() && !name.contains('@') {
                return ClassNameToken::ScopedLocal(name.to_string());
            }
        }

        if let Some((path, name)) = raw.rsplit_once('@') {
            if !path.is_empty() && !name.is_empty() && !name.contains('/') {
                return ClassNameToken::ScopedRemote {
                    path: path.to_string(),
                    name: name.to_string(),
                };
            }
        }

        ClassNameToken::Plain(raw.to_string())
    }

    /// The authored class name without sigil or path.
    pub fn name(&self) -> &str {
        match self {
            ClassNameToken::Plain(name) | ClassNameToken::ScopedLocal(name) => name,
            ClassNameToken::ScopedRemote { name, .. } => name,
        }
    }

    pub fn is_scoped(&self) -> bool {
        !matches!(self, ClassNameToken::Plain(_))
    }
}

impl From<&str> for ClassNameToken {
    fn from(raw: &str) -> Self {
        ClassNameToken::parse(raw)
    }
}

impl From<String> for ClassNameToken {
    fn from(raw: String) -> Self {
        ClassNameToken::parse(&raw)
    }
}

impl From<&String> for ClassNameToken {
    fn from(raw: &String) -> Self {
        ClassNameToken::parse(raw)
    }
}

/// A scoped class name: the authored name followed by an 8-character digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashedClassName {
    name: String,
    digest: String,
}

impl HashedClassName {
    pub const DIGEST_LEN: usize = 8;

    pub fn new(name: impl Into<String>, digest: &str) -> Self {
        let digest = digest.get(..Self::DIGEST_LEN).unwrap_or(digest);
        Self {
            name: name.into(),
            digest: digest.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl fmt::Display for HashedClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.digest)
    }
}
