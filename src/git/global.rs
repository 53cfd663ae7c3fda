use git2::{Config, ConfigLevel, ErrorCode};

use super::store::{OVERRIDE_KEY, OVERRIDE_SECTION};
use crate::error::Result;

/// `core.hooksPath` from the user's global git config, as
/// `git config --global` reports it: `~/.gitconfig` wins over
/// `$XDG_CONFIG_HOME/git/config`. System and repository scopes are ignored.
pub fn global_hooks_path() -> Result<Option<String>> {
    let config = Config::open_default()?;
    let name = format!("{OVERRIDE_SECTION}.{OVERRIDE_KEY}");

    for level in [ConfigLevel::Global, ConfigLevel::XDG] {
        let scoped = match config.open_level(level) {
            Ok(scoped) => scoped,
            Err(e) if e.code() == ErrorCode::NotFound => continue,
            Err(e) => return Err(e.into()),
        };
        match scoped.get_string(&name) {
            Ok(value) => return Ok(Some(value)),
            Err(e) if e.code() == ErrorCode::NotFound => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(None)
}
