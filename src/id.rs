use std::{fmt, str::FromStr};

use compact_str::CompactString;
use url::Url;

use crate::result::{AppError, Result};

/// A GitHub repository, identified by owner and name
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct RepoId {
    owner: CompactString,
    name: CompactString,
}

impl RepoId {
    pub fn new(owner: impl Into<CompactString>, name: impl Into<CompactString>) -> Self {
        Self { owner: owner.into(), name: name.into() }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse either `owner/name` or a repository URL such as
    /// `https://github.com/owner/name/tree/main`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.starts_with("http://") || input.starts_with("https://") {
            Self::parse_url(input)
        } else {
            Self::parse_compact(input)
        }
    }

    fn parse_url(input: &str) -> Result<Self> {
        let url = Url::parse(input)
            .map_err(|_| AppError::invalid_repo(input, "Not a valid repository URL"))?;

        let mut segments = url.path().trim_matches('/').split('/');
        match (segments.next(), segments.next()) {
            (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => {
                let name = name.strip_suffix(".git").unwrap_or(name);
                if name.is_empty() {
                    return Err(AppError::invalid_repo(
                        input,
                        "Could not parse owner/repo from URL",
                    ));
                }
                Ok(Self::new(owner, name))
            },
            _ => Err(AppError::invalid_repo(input, "Could not parse owner/repo from URL")),
        }
    }

    fn parse_compact(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split('/').collect();
        match parts.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self::new(*owner, *name)),
            _ => Err(AppError::invalid_repo(
                input,
                "Repo must be \"owner/repo\" or a GitHub URL",
            )),
        }
    }
}

impl FromStr for RepoId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_and_url_forms_agree() {
        let expected = RepoId::new("rust-lang", "cargo");
        for input in [
            "rust-lang/cargo",
            "  rust-lang/cargo\n",
            "https://github.com/rust-lang/cargo",
            "https://github.com/rust-lang/cargo/",
            "http://github.com/rust-lang/cargo",
            "https://github.com/rust-lang/cargo/tree/master/src",
            "https://github.com/rust-lang/cargo.git",
        ] {
            assert_eq!(RepoId::parse(input).unwrap(), expected, "input: {input:?}");
        }
    }

    #[test]
    fn malformed_identifiers_are_rejected() {
        for input in [
            "",
            "cargo",
            "rust-lang/",
            "/cargo",
            "rust-lang/cargo/extra",
            "https://github.com",
            "https://github.com/",
            "https://github.com/rust-lang",
            "https://github.com//cargo",
        ] {
            let err = RepoId::parse(input).unwrap_err();
            assert!(err.is_validation_error(), "input: {input:?} gave {err}");
        }
    }

    #[test]
    fn displays_as_owner_slash_name() {
        let repo: RepoId = "octo/hello".parse().unwrap();
        assert_eq!(repo.to_string(), "octo/hello");
        assert_eq!(repo.owner(), "octo");
        assert_eq!(repo.name(), "hello");
    }
}
