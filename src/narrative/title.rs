/// Branch prefixes and the conventional commit type they map to.
const BRANCH_TYPES: &[(&[&str], &str)] = &[
    (&["feat", "feature"], "feat"),
    (&["fix", "bugfix", "hotfix"], "fix"),
    (&["chore", "task"], "chore"),
    (&["docs", "documentation"], "docs"),
    (&["refactor", "refactoring"], "refactor"),
    (&["test", "tests", "testing"], "test"),
    (&["style", "styling"], "style"),
    (&["perf", "performance"], "perf"),
];

fn humanize(text: &str) -> String {
    text.replace(['-', '_'], " ").to_lowercase().trim().to_string()
}

/// Conventional-commit style PR title derived from a branch name, e.g.
/// `feature/Add-Login_Form` becomes `feat: add login form`.
pub fn title_from_branch(branch: &str) -> String {
    if let Some((prefix, rest)) = branch.split_once('/') {
        if !rest.is_empty() {
            let kind = BRANCH_TYPES
                .iter()
                .find(|(prefixes, _)| prefixes.contains(&prefix))
                .map(|(_, kind)| *kind);
            if let Some(kind) = kind {
                return format!("{}: {}", kind, humanize(rest));
            }
        }
    }
    format!("chore: {}", humanize(branch))
}

pub fn release_pr_title(version: &str) -> String {
    format!("chore: release {}", version)
}
