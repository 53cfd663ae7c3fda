//! Both config store backends must agree on every fixture

use git_hooks::git::Removal;
use git_hooks::{ConfigStore, HooksError, LibGitStore, Repository, TextStore};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const STORES: [&dyn ConfigStore; 2] = [&TextStore, &LibGitStore];

struct Fixture {
    name: &'static str,
    config: &'static str,
    expected: Option<&'static str>,
}

const FIXTURES: &[Fixture] = &[
    Fixture {
        name: "plain value",
        config: "[core]\n\trepositoryformatversion = 0\n\thooksPath = .husky\n",
        expected: Some(".husky"),
    },
    Fixture {
        name: "no override",
        config: "[core]\n\trepositoryformatversion = 0\n\tbare = false\n",
        expected: None,
    },
    Fixture {
        name: "key in another section",
        config: "[core]\n\tbare = false\n[husky]\n\thooksPath = .husky\n",
        expected: None,
    },
    Fixture {
        name: "key in a core subsection",
        config: "[core]\n\tbare = false\n[core \"extra\"]\n\thooksPath = .husky\n",
        expected: None,
    },
    Fixture {
        name: "section named core in quotes",
        config: "[custom \"core\"]\n\thooksPath = .husky\n",
        expected: None,
    },
    Fixture {
        name: "case insensitive names",
        config: "[CORE]\n\tHOOKSPATH = .githooks\n",
        expected: Some(".githooks"),
    },
    Fixture {
        name: "quoted value with spaces",
        config: "[core]\n\thooksPath = \"my hooks\"\n",
        expected: Some("my hooks"),
    },
    Fixture {
        name: "inline comment",
        config: "[core]\n\thooksPath = .husky ; set by husky install\n",
        expected: Some(".husky"),
    },
    Fixture {
        name: "last occurrence wins",
        config: "[core]\n\thooksPath = first\n[user]\n\tname = Test User\n[core]\n\thooksPath = second\n",
        expected: Some("second"),
    },
    Fixture {
        name: "commented out key",
        config: "[core]\n\t# hooksPath = .husky\n\t; hooksPath = .husky\n\tbare = false\n",
        expected: None,
    },
    Fixture {
        name: "similar key names",
        config: "[core]\n\thooksPathOld = .old\n\txhooksPath = .x\n",
        expected: None,
    },
    Fixture {
        name: "bare key before a value",
        config: "[core]\n\thooksPath\n\thooksPath = .husky\n\tbare = false\n",
        expected: Some(".husky"),
    },
    Fixture {
        name: "value continued on the next line",
        config: "[core]\n\thooksPath = .hu\\\nsky\n\tbare = false\n",
        expected: Some(".husky"),
    },
    Fixture {
        name: "continued value swallows the next line",
        config: "[user]\n\tname = first\\\n\thooksPath = .husky\n[core]\n\tbare = false\n",
        expected: None,
    },
    Fixture {
        name: "key on the header line",
        config: "[core] hooksPath = .husky\n\tbare = false\n",
        expected: Some(".husky"),
    },
];

fn repository_with_config(temp_dir: &TempDir, config: &str) -> Repository {
    let repository = Repository::new(temp_dir.path());
    fs::create_dir_all(&repository.metadata_dir).unwrap();
    fs::write(&repository.config_path, config).unwrap();
    repository
}

/// Every key/value pair in the file except the override, as git2 sees them
fn entries_without_override(path: &Path) -> Vec<(String, Option<String>)> {
    let config = git2::Config::open(path).unwrap();
    let mut entries = Vec::new();
    let mut iter = config.entries(None).unwrap();
    while let Some(entry) = iter.next() {
        let entry = entry.unwrap();
        let name = entry.name().unwrap().to_string();
        if name != "core.hookspath" {
            let value = entry.has_value().then(|| entry.value().unwrap().to_string());
            entries.push((name, value));
        }
    }
    entries
}

#[test]
fn test_backends_read_the_same_value() {
    for fixture in FIXTURES {
        for store in STORES {
            let temp_dir = TempDir::new().unwrap();
            let repository = repository_with_config(&temp_dir, fixture.config);

            let value = store.read_override(&repository.config_path).unwrap();
            assert_eq!(
                value.as_deref(),
                fixture.expected,
                "{} store, fixture '{}'",
                store.name(),
                fixture.name
            );
        }
    }
}

#[test]
fn test_backends_remove_only_the_override() {
    for fixture in FIXTURES {
        for store in STORES {
            let temp_dir = TempDir::new().unwrap();
            let repository = repository_with_config(&temp_dir, fixture.config);
            let before = entries_without_override(&repository.config_path);

            let removal = store.remove_override(&repository).unwrap();
            let expected_removal = if fixture.expected.is_some() {
                Removal::Removed
            } else {
                Removal::AlreadyAbsent
            };
            assert_eq!(removal, expected_removal, "{} store, fixture '{}'", store.name(), fixture.name);

            assert_eq!(store.read_override(&repository.config_path).unwrap(), None);
            assert_eq!(
                entries_without_override(&repository.config_path),
                before,
                "{} store changed other settings in fixture '{}'",
                store.name(),
                fixture.name
            );

            if removal == Removal::AlreadyAbsent {
                assert_eq!(fs::read_to_string(&repository.config_path).unwrap(), fixture.config);
            }
        }
    }
}

#[test]
fn test_removal_is_idempotent() {
    for store in STORES {
        let temp_dir = TempDir::new().unwrap();
        let repository = repository_with_config(&temp_dir, "[core]\n\thooksPath = .husky\n");

        assert_eq!(store.remove_override(&repository).unwrap(), Removal::Removed);
        assert_eq!(store.remove_override(&repository).unwrap(), Removal::AlreadyAbsent);
    }
}

#[test]
fn test_missing_config_is_a_read_error() {
    for store in STORES {
        let temp_dir = TempDir::new().unwrap();
        let repository = Repository::new(temp_dir.path());
        fs::create_dir_all(&repository.metadata_dir).unwrap();

        assert!(matches!(
            store.read_override(&repository.config_path),
            Err(HooksError::StoreRead { .. })
        ));
        assert!(matches!(
            store.remove_override(&repository),
            Err(HooksError::StoreRead { .. })
        ));
    }
}

#[test]
fn test_backends_leave_the_same_file() {
    let rewritten = [
        ("[core]\n\thooksPath\n\thooksPath = .husky\n\tbare = false\n", "[core]\n\tbare = false\n"),
        ("[core]\n\thooksPath = .hu\\\nsky\n\tbare = false\n", "[core]\n\tbare = false\n"),
        ("[core] hooksPath = .husky\n\tbare = false\n", "[core]\n\tbare = false\n"),
    ];

    for (config, expected) in rewritten {
        for store in STORES {
            let temp_dir = TempDir::new().unwrap();
            let repository = repository_with_config(&temp_dir, config);

            assert_eq!(store.remove_override(&repository).unwrap(), Removal::Removed);
            assert_eq!(
                fs::read_to_string(&repository.config_path).unwrap(),
                expected,
                "{} store",
                store.name()
            );
        }
    }
}

#[test]
fn test_text_store_preserves_bytes() {
    let temp_dir = TempDir::new().unwrap();
    let config = "# managed by setup script\n[core]\n\trepositoryformatversion = 0\n\thooksPath = .husky\n\n[remote \"origin\"]\n\turl = git@example.com:org/repo.git\n\tfetch = +refs/heads/*:refs/remotes/origin/*\n";
    let repository = repository_with_config(&temp_dir, config);

    TextStore.remove_override(&repository).unwrap();

    assert_eq!(
        fs::read_to_string(&repository.config_path).unwrap(),
        config.replace("\thooksPath = .husky\n", "")
    );
}
