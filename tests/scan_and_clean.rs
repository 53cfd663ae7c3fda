//! End-to-end discovery and cleanup on fixture trees

use git_hooks::parallel::ExecutionStrategy;
use git_hooks::{CancelToken, Cleaner, ConfigStore, LibGitStore, Scanner, TextStore, cleaner, scanner};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const STORES: [&dyn ConfigStore; 2] = [&TextStore, &LibGitStore];

const HUSKY_CONFIG: &str = "[core]\n\trepositoryformatversion = 0\n\thooksPath = .husky\n[user]\n\tname = Test User\n";
const CLEAN_CONFIG: &str = "[core]\n\trepositoryformatversion = 0\n\tbare = false\n";

fn make_repo(path: &Path, config: &str) {
    fs::create_dir_all(path.join(".git")).unwrap();
    fs::write(path.join(".git/config"), config).unwrap();
}

/// A workspace with overrides at several depths, some hidden in skipped
/// directories or inside other repositories
fn fixture_tree() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    make_repo(&root.join("api"), HUSKY_CONFIG);
    make_repo(&root.join("clean"), CLEAN_CONFIG);
    make_repo(&root.join("team/web"), "[core]\n\thooksPath = .githooks\n");
    make_repo(&root.join("team/web/packages/nested"), HUSKY_CONFIG);
    make_repo(&root.join("web/node_modules/some-package"), HUSKY_CONFIG);
    make_repo(&root.join("tools/.venv/src/dep"), HUSKY_CONFIG);
    make_repo(&root.join("go/vendor/github.com/x"), HUSKY_CONFIG);
    make_repo(&root.join("infra/.terraform/modules/m"), HUSKY_CONFIG);
    make_repo(&root.join("a/b/c/d/deep"), HUSKY_CONFIG);

    temp_dir
}

fn paths(repositories: &[git_hooks::Repository]) -> Vec<PathBuf> {
    repositories.iter().map(|r| r.path.clone()).collect()
}

#[test]
fn test_scan_finds_reachable_overrides_in_order() {
    let temp_dir = fixture_tree();
    let root = temp_dir.path();

    for store in STORES {
        let found = Scanner::new(store).scan(root).unwrap();
        assert_eq!(
            paths(&found),
            vec![root.join("a/b/c/d/deep"), root.join("api"), root.join("team/web")],
            "{} store",
            store.name()
        );
        assert_eq!(found[2].override_value.as_deref(), Some(".githooks"));
    }
}

#[test]
fn test_max_depth_limits_discovery() {
    let temp_dir = fixture_tree();
    let root = temp_dir.path();

    // a/b/c/d/deep sits at depth 5
    let found = scanner::scan(root, 4, &CancelToken::new()).unwrap();
    assert!(!paths(&found).contains(&root.join("a/b/c/d/deep")));

    let found = scanner::scan(root, 5, &CancelToken::new()).unwrap();
    assert!(paths(&found).contains(&root.join("a/b/c/d/deep")));
}

#[test]
fn test_scan_is_repeatable() {
    let temp_dir = fixture_tree();
    let first = scanner::scan(temp_dir.path(), 10, &CancelToken::new()).unwrap();
    let second = scanner::scan(temp_dir.path(), 10, &CancelToken::new()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_cancelled_scan_returns_no_partial_list() {
    let temp_dir = fixture_tree();
    let cancel = CancelToken::new();
    cancel.cancel();

    let result = scanner::scan(temp_dir.path(), 10, &cancel);
    assert!(result.unwrap_err().is_cancelled());
}

#[test]
fn test_clean_removes_only_the_override() {
    for store in STORES {
        let temp_dir = TempDir::new().unwrap();
        make_repo(temp_dir.path(), HUSKY_CONFIG);

        let found = Scanner::new(store).scan(temp_dir.path()).unwrap();
        let summary = Cleaner::new(store).clean(&found);

        assert_eq!(summary.configs_removed, 1);
        assert_eq!(summary.results[0].previous_value, ".husky");
        assert!(summary.results[0].removed);

        // Nothing left to find afterwards
        assert!(Scanner::new(store).scan(temp_dir.path()).unwrap().is_empty());

        let config = git2::Config::open(&temp_dir.path().join(".git/config")).unwrap();
        assert_eq!(config.get_i32("core.repositoryformatversion").unwrap(), 0);
        assert_eq!(config.get_string("user.name").unwrap(), "Test User");
    }
}

#[test]
fn test_clean_matches_documented_example() {
    let temp_dir = TempDir::new().unwrap();
    make_repo(temp_dir.path(), HUSKY_CONFIG);

    let found = scanner::scan(temp_dir.path(), 10, &CancelToken::new()).unwrap();
    let summary = cleaner::clean(&found, &CancelToken::new());

    assert_eq!(summary.results[0].previous_value, ".husky");
    assert_eq!(
        fs::read_to_string(temp_dir.path().join(".git/config")).unwrap(),
        "[core]\n\trepositoryformatversion = 0\n[user]\n\tname = Test User\n"
    );
}

#[test]
fn test_batch_of_three() {
    let temp_dir = TempDir::new().unwrap();
    for name in ["one", "two", "three"] {
        make_repo(&temp_dir.path().join(name), HUSKY_CONFIG);
    }

    let found = scanner::scan(temp_dir.path(), 10, &CancelToken::new()).unwrap();
    let summary = cleaner::clean(&found, &CancelToken::new());

    assert_eq!(summary.repositories_with_config, 3);
    assert_eq!(summary.configs_removed, 3);
    assert_eq!(summary.results.len(), 3);
}

#[test]
fn test_cancelled_batch_touches_nothing_else() {
    let temp_dir = TempDir::new().unwrap();
    for name in ["one", "two", "three"] {
        make_repo(&temp_dir.path().join(name), HUSKY_CONFIG);
    }
    let found = scanner::scan(temp_dir.path(), 10, &CancelToken::new()).unwrap();

    let cancel = CancelToken::new();
    cancel.cancel();
    let summary = cleaner::clean(&found, &cancel);

    assert_eq!(summary.results.len(), 1);
    assert!(summary.results[0].is_cancelled());
    for name in ["one", "two", "three"] {
        assert_eq!(
            fs::read_to_string(temp_dir.path().join(name).join(".git/config")).unwrap(),
            HUSKY_CONFIG
        );
    }
}

#[test]
fn test_parallel_clean_agrees_with_sequential() {
    let temp_dir = TempDir::new().unwrap();
    for i in 0..16 {
        make_repo(&temp_dir.path().join(format!("repo-{i:02}")), HUSKY_CONFIG);
    }
    let found = scanner::scan(temp_dir.path(), 10, &CancelToken::new()).unwrap();

    let summary = Cleaner::new(&LibGitStore)
        .with_strategy(ExecutionStrategy::Parallel { workers: 4 })
        .clean(&found);

    assert_eq!(summary.configs_removed, 16);
    assert_eq!(
        summary.results.iter().map(|r| r.repository.path.clone()).collect::<Vec<_>>(),
        paths(&found)
    );
    assert!(scanner::scan(temp_dir.path(), 10, &CancelToken::new()).unwrap().is_empty());
}
