//! Build metadata for `--version` output and the default HTTP user agent.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git branch at build time, or "unknown" if unavailable.
pub const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => "unknown",
};

/// Git commit SHA at build time, or "unknown" if unavailable.
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

/// Build date (`YYYY-MM-DD`), or "unknown" if unavailable.
pub const BUILD_DATE: &str = match option_env!("VERGEN_BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};

/// Whether the working tree was dirty at build time.
pub fn git_dirty() -> bool {
    option_env!("VERGEN_GIT_DIRTY") == Some("true")
}

/// Short version string: `{version}+{sha}` with `.dirty` appended for dirty trees.
///
/// Builds made outside a git checkout report just the package version.
pub fn version_string() -> String {
    if GIT_SHA == "unknown" {
        return PKG_VERSION.to_string();
    }
    let dirty_suffix = if git_dirty() { ".dirty" } else { "" };
    format!(
        "{PKG_VERSION}+{}{dirty_suffix}",
        &GIT_SHA[..7.min(GIT_SHA.len())]
    )
}

/// Long version for the CLI: short version, branch and build date.
pub fn long_version() -> String {
    format!(
        "{} (branch {GIT_BRANCH}, built {BUILD_DATE})",
        version_string()
    )
}

/// `User-Agent` sent to the encyclopedia API unless configured otherwise.
///
/// Wikimedia asks API clients to identify themselves.
pub fn default_user_agent() -> String {
    format!("whatflower/{PKG_VERSION}")
}
