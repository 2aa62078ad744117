//! Repository identity used to recognize absolute self-links.

use log::debug;
use std::path::Path;

const REF_VIEW_SEGMENTS: &[&str] = &["blob", "tree", "raw", "edit"];

/// Host/owner/name triple identifying a hosted repository.
///
/// All parts are stored lowercase; hosting services treat them
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocator {
    pub host: String,
    pub owner: String,
    pub name: String,
}

impl RepoLocator {
    /// Parses `https://host/owner/repo[.git]` or `git@host:owner/repo.git`.
    ///
    /// Extra path segments after the repository name are ignored.
    pub fn parse(url: &str) -> Option<Self> {
        let url = url.trim();
        let (host, path) = if let Some((_, rest)) = url.split_once("://") {
            let rest = rest.rsplit_once('@').map_or(rest, |(_, tail)| tail);
            rest.split_once('/')?
        } else {
            // scp-like syntax: `user@host:owner/repo.git`
            let (_, rest) = url.split_once('@')?;
            rest.split_once(':')?
        };

        let host = normalize_host(host)?;
        let mut segments = path.split('/').filter(|segment| !segment.is_empty());
        let owner = segments.next()?.to_ascii_lowercase();
        let name = segments.next()?;
        let name = name.strip_suffix(".git").unwrap_or(name).to_ascii_lowercase();
        if name.is_empty() {
            return None;
        }

        Some(Self { host, owner, name })
    }

    /// Reads the `origin` remote URL from `<root>/.git/config`.
    ///
    /// Returns `None` when the file, the remote or a parsable URL is absent.
    pub fn from_git_config(root: &Path) -> Option<Self> {
        let text = std::fs::read_to_string(root.join(".git").join("config")).ok()?;
        let mut in_origin = false;
        for line in text.lines() {
            let line = line.trim();
            if line.starts_with('[') {
                in_origin = line == "[remote \"origin\"]";
                continue;
            }
            if !in_origin {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                if key.trim() == "url" {
                    let locator = Self::parse(value.trim());
                    debug!(
                        "event=repo_locator module=index status={} source=git_config",
                        if locator.is_some() { "ok" } else { "unrecognized" }
                    );
                    return locator;
                }
            }
        }
        None
    }

    /// Maps an absolute `http(s)` URL into this repository to a relative path.
    ///
    /// Returns `None` for URLs of other hosts or repositories. A URL to the
    /// repository home page maps to an empty path. Ref views such as
    /// `/blob/<ref>/` are stripped; the ref is assumed to be one segment.
    pub fn relative_path(&self, url: &str) -> Option<String> {
        let (scheme, rest) = url.split_once("://")?;
        if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
            return None;
        }
        let rest = rest.split(['#', '?']).next().unwrap_or(rest);
        let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
        if normalize_host(host)? != self.host {
            return None;
        }

        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>();
        let [owner, name, tail @ ..] = segments.as_slice() else {
            return None;
        };
        let name = name.strip_suffix(".git").unwrap_or(*name);
        if !owner.eq_ignore_ascii_case(&self.owner) || !name.eq_ignore_ascii_case(&self.name) {
            return None;
        }

        let tail = match tail {
            [view, _git_ref, path @ ..] if REF_VIEW_SEGMENTS.contains(view) => path,
            other => other,
        };
        Some(tail.join("/"))
    }
}

fn normalize_host(host: &str) -> Option<String> {
    let host = host.split(':').next().unwrap_or(host).to_ascii_lowercase();
    let host = host.strip_prefix("www.").map(str::to_string).unwrap_or(host);
    if host.is_empty() || (!host.contains('.') && host != "localhost") {
        return None;
    }
    Some(host)
}

#[cfg(test)]
mod tests {
    use super::RepoLocator;

    fn locator() -> RepoLocator {
        RepoLocator::parse("https://github.com/jdoe/til").expect("locator should parse")
    }

    #[test]
    fn parses_https_and_scp_forms() {
        let expected = locator();
        assert_eq!(
            RepoLocator::parse("git@github.com:jdoe/TIL.git"),
            Some(expected.clone())
        );
        assert_eq!(
            RepoLocator::parse("https://token@GitHub.com/jdoe/til.git/"),
            Some(expected)
        );
        assert_eq!(RepoLocator::parse("not a url"), None);
        assert_eq!(RepoLocator::parse("https://github.com/jdoe"), None);
    }

    #[test]
    fn relative_path_strips_ref_views_and_fragments() {
        let locator = locator();
        assert_eq!(
            locator
                .relative_path("https://github.com/jdoe/til/blob/master/git/rebase.md#usage")
                .as_deref(),
            Some("git/rebase.md")
        );
        assert_eq!(
            locator
                .relative_path("https://www.github.com/JDoe/til/tree/main/docker")
                .as_deref(),
            Some("docker")
        );
        assert_eq!(
            locator.relative_path("https://github.com/jdoe/til").as_deref(),
            Some("")
        );
    }

    #[test]
    fn relative_path_rejects_other_repositories() {
        let locator = locator();
        assert_eq!(
            locator.relative_path("https://github.com/other/til/blob/master/a.md"),
            None
        );
        assert_eq!(
            locator.relative_path("https://gitlab.com/jdoe/til/blob/master/a.md"),
            None
        );
        assert_eq!(locator.relative_path("ftp://github.com/jdoe/til/a.md"), None);
    }

    #[test]
    fn reads_origin_from_git_config() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir(dir.path().join(".git")).expect("git dir");
        std::fs::write(
            dir.path().join(".git").join("config"),
            "[core]\n\tbare = false\n[remote \"upstream\"]\n\turl = https://github.com/x/y\n\
             [remote \"origin\"]\n\turl = git@github.com:jdoe/til.git\n",
        )
        .expect("write git config");

        assert_eq!(RepoLocator::from_git_config(dir.path()), Some(locator()));
    }

    #[test]
    fn missing_git_config_is_not_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert_eq!(RepoLocator::from_git_config(dir.path()), None);
    }
}
