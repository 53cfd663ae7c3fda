//! Hook names, installed-hook inventory and diagnostics
//!
//! [`GIT_HOOKS`] is the fixed table of every hook git can invoke. It is passed
//! explicitly to whatever needs it rather than consulted as ambient state.

mod diagnose;
mod inventory;

pub use diagnose::{FileInfo, GlobalHook, HookFile, HookReport, Script, ScriptDir, SetupReport, diagnose_hook, diagnose_setup};
pub use inventory::{HookLocations, HookScripts, HuskyFormat, HuskyHook, Inventory, inventory};

/// Client and server hooks, in the order git's documentation lists them
pub const GIT_HOOKS: &[&str] = &[
    "applypatch-msg",
    "pre-applypatch",
    "post-applypatch",
    "pre-commit",
    "pre-merge-commit",
    "prepare-commit-msg",
    "commit-msg",
    "post-commit",
    "pre-rebase",
    "post-checkout",
    "post-merge",
    "pre-push",
    "pre-receive",
    "update",
    "proc-receive",
    "post-receive",
    "post-update",
    "reference-transaction",
    "push-to-checkout",
    "pre-auto-gc",
    "post-rewrite",
    "sendemail-validate",
    "fsmonitor-watchman",
    "p4-changelist",
    "p4-prepare-changelist",
    "p4-post-changelist",
    "p4-pre-submit",
    "post-index-change",
];

pub fn is_known_hook(name: &str) -> bool {
    GIT_HOOKS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hook_table() {
        assert_eq!(GIT_HOOKS.len(), 28);
        let unique: HashSet<_> = GIT_HOOKS.iter().collect();
        assert_eq!(unique.len(), GIT_HOOKS.len());

        assert!(is_known_hook("pre-commit"));
        assert!(is_known_hook("post-index-change"));
        assert!(!is_known_hook("pre-commit.d"));
        assert!(!is_known_hook("PRE-COMMIT"));
    }
}
