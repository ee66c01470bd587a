//! Build script for the XertiQ Wallet client
//!
//! Stamps the binary with the commit it was built from, shown by
//! `xertiq --version`.

use std::process::Command;

/// Set by release pipelines that build from a source tarball without `.git`
const HASH_OVERRIDE: &str = "XERTIQ_GIT_HASH";

fn main() {
    println!("cargo:rerun-if-env-changed={}", HASH_OVERRIDE);
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let hash = std::env::var(HASH_OVERRIDE)
        .ok()
        .filter(|h| !h.trim().is_empty())
        .or_else(git_describe)
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=GIT_HASH={}", hash.trim());
}

/// Abbreviated commit, suffixed with `-dirty` for uncommitted changes
fn git_describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=10"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok()
}
