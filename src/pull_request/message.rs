//! Branch names, titles and descriptions for dependency pull requests.
use regex::Regex;

use crate::{
    Result,
    config::PackageManager,
    ecosystem::types::{Requirement, UpdatedDependency},
};

pub const BRANCH_PREFIX: &str = "bumpkin";

/// Directory without surrounding slashes, `None` for the repository root.
fn directory_segment(directory: &str) -> Option<&str> {
    let trimmed = directory.trim_matches('/');
    (!trimmed.is_empty()).then_some(trimmed)
}

fn version_of(dep: &UpdatedDependency) -> &str {
    dep.version.as_deref().unwrap_or("latest")
}

/// Makes an arbitrary string safe to use as a git ref.
pub fn sanitize_ref(name: &str) -> Result<String> {
    let invalid_chars = Regex::new(r"[^A-Za-z0-9._/\-]+")?;
    let repeated_dots = Regex::new(r"\.{2,}")?;
    let repeated_slashes = Regex::new(r"/{2,}")?;

    let name = invalid_chars.replace_all(name, "-");
    let name = repeated_dots.replace_all(&name, ".");
    let name = repeated_slashes.replace_all(&name, "/");

    Ok(name
        .trim_end_matches(['.', '/'])
        .trim_end_matches(".lock")
        .to_string())
}

/// Deterministic branch name so re-runs find the pull request they opened
/// before: `bumpkin/<pm>/<directory>/<name>-<version>`.
pub fn branch_name(
    package_manager: PackageManager,
    directory: &str,
    dependencies: &[UpdatedDependency],
) -> Result<String> {
    let target = match dependencies {
        [] => "dependencies".to_string(),
        [dep] => format!("{}-{}", dep.name, version_of(dep)),
        [dep, rest @ ..] => format!(
            "{}-{}-and-{}-more",
            dep.name,
            version_of(dep),
            rest.len()
        ),
    };

    let mut segments = vec![BRANCH_PREFIX, package_manager.as_str()];

    if let Some(dir) = directory_segment(directory) {
        segments.push(dir);
    }

    segments.push(&target);

    sanitize_ref(&segments.join("/"))
}

fn join_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [one] => one.to_string(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

/// "Bump foo from 1.0 to 1.1", with " in <dir>" outside the root.
pub fn title(directory: &str, dependencies: &[UpdatedDependency]) -> String {
    let mut title = match dependencies {
        [dep] => format!(
            "Bump {} from {} to {}",
            dep.name,
            dep.previous_version.as_deref().unwrap_or("unknown"),
            version_of(dep)
        ),
        deps => {
            let names: Vec<&str> = deps.iter().map(|d| d.name.as_str()).collect();
            format!("Bump {}", join_names(&names))
        }
    };

    if let Some(dir) = directory_segment(directory) {
        title.push_str(&format!(" in /{dir}"));
    }

    title
}

fn constraint(req: Option<&Requirement>) -> &str {
    req.and_then(|r| r.requirement.as_deref()).unwrap_or("-")
}

/// Markdown description listing each version change and every requirement
/// rewritten in a dependency file.
pub fn body(dependencies: &[UpdatedDependency]) -> String {
    let mut body = String::new();

    for dep in dependencies {
        body.push_str(&format!(
            "Bumps `{}` from {} to {}.\n",
            dep.name,
            dep.previous_version.as_deref().unwrap_or("unknown"),
            version_of(dep)
        ));
    }

    let rows: Vec<String> = dependencies
        .iter()
        .flat_map(|dep| {
            dep.changed_requirements()
                .into_iter()
                .map(move |(new, previous)| {
                    format!(
                        "| {} | {} | {} | {} |",
                        dep.name,
                        new.file,
                        constraint(previous),
                        constraint(Some(new))
                    )
                })
        })
        .collect();

    if !rows.is_empty() {
        body.push_str("\n| Dependency | File | Previous requirement | New requirement |\n");
        body.push_str("|---|---|---|---|\n");
        for row in rows {
            body.push_str(&row);
            body.push('\n');
        }
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn branch_name_for_root_directory() {
        let deps = vec![create_test_updated_dependency("foo", "1.0", "1.1")];

        assert_eq!(
            branch_name(PackageManager::Bundler, "/", &deps).unwrap(),
            "bumpkin/bundler/foo-1.1"
        );
    }

    #[test]
    fn branch_name_includes_directory() {
        let deps = vec![create_test_updated_dependency("foo", "1.0", "1.1")];

        assert_eq!(
            branch_name(PackageManager::NpmAndYarn, "/apps/web/", &deps)
                .unwrap(),
            "bumpkin/npm-and-yarn/apps/web/foo-1.1"
        );
    }

    #[test]
    fn branch_name_for_multiple_dependencies() {
        let deps = vec![
            create_test_updated_dependency("foo", "1.0", "2.0"),
            create_test_updated_dependency("bar", "3.0", "4.0"),
        ];

        assert_eq!(
            branch_name(PackageManager::Bundler, "/", &deps).unwrap(),
            "bumpkin/bundler/foo-2.0-and-1-more"
        );
    }

    #[test]
    fn sanitizes_invalid_ref_characters() {
        assert_eq!(
            sanitize_ref("bumpkin/npm-and-yarn/@types/node-^1.0").unwrap(),
            "bumpkin/npm-and-yarn/-types/node--1.0"
        );
        assert_eq!(sanitize_ref("a//b..c.").unwrap(), "a/b.c");
        assert_eq!(
            sanitize_ref("bumpkin/cargo/foo.lock").unwrap(),
            "bumpkin/cargo/foo"
        );
    }

    #[test]
    fn title_for_single_dependency() {
        let deps = vec![create_test_updated_dependency("foo", "1.0", "1.1")];

        assert_eq!(title("/", &deps), "Bump foo from 1.0 to 1.1");
        assert_eq!(title("/api", &deps), "Bump foo from 1.0 to 1.1 in /api");
    }

    #[test]
    fn title_for_multiple_dependencies() {
        let deps = vec![
            create_test_updated_dependency("foo", "1.0", "2.0"),
            create_test_updated_dependency("bar", "3.0", "4.0"),
            create_test_updated_dependency("baz", "5.0", "6.0"),
        ];

        assert_eq!(title("/", &deps[..2]), "Bump foo and bar");
        assert_eq!(title("/", &deps), "Bump foo, bar and baz");
    }

    #[test]
    fn body_lists_requirement_changes() {
        let deps = vec![create_test_updated_dependency("foo", "1.0", "1.1")];

        let body = body(&deps);

        assert!(body.starts_with("Bumps `foo` from 1.0 to 1.1.\n"));
        assert!(body.contains("| foo | Gemfile | ~> 1.0 | ~> 1.1 |"));
    }

    #[test]
    fn body_omits_table_without_requirement_changes() {
        let mut dep = create_test_updated_dependency("foo", "1.0", "1.1");
        dep.requirements = dep.previous_requirements.clone();

        let body = body(&[dep]);

        assert!(!body.contains("| Dependency |"));
    }
}
