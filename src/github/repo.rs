use anyhow::{bail, Result};
use std::fmt;
use std::str::FromStr;

/// A repository in "owner/name" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl RepoSlug {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim().trim_end_matches('/');
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(RepoSlug {
                owner: owner.to_string(),
                name: name.trim_end_matches(".git").to_string(),
            }),
            _ => bail!("Repository must be in the form owner/repo, got '{}'", s),
        }
    }
}

impl FromStr for RepoSlug {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        RepoSlug::parse(s)
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let slug = RepoSlug::parse("rust-lang/cargo").unwrap();
        assert_eq!(slug.owner, "rust-lang");
        assert_eq!(slug.name, "cargo");
        assert_eq!(slug.to_string(), "rust-lang/cargo");
    }

    #[test]
    fn test_parse_strips_git_suffix_and_slash() {
        let slug: RepoSlug = "owner/repo.git/".parse().unwrap();
        assert_eq!(slug.name, "repo");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(RepoSlug::parse("just-a-name").is_err());
        assert!(RepoSlug::parse("a/b/c").is_err());
        assert!(RepoSlug::parse("/repo").is_err());
        assert!(RepoSlug::parse("owner/").is_err());
    }
}
