// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

/// Emits `GIT_VERSION` as `<package version>+<short commit>`.
///
/// `PHOTOBOOTH_VERSION` wins when set, for builds outside a git checkout.
fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-env-changed=PHOTOBOOTH_VERSION");

    let package = env!("CARGO_PKG_VERSION");
    let version = std::env::var("PHOTOBOOTH_VERSION").unwrap_or_else(|_| match short_commit() {
        Some(commit) => format!("{package}+{commit}"),
        None => package.to_string(),
    });

    println!("cargo::rustc-env=GIT_VERSION={version}");
}

fn short_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    let commit = String::from_utf8(output.stdout).ok()?;
    let commit = commit.trim();
    (output.status.success() && !commit.is_empty()).then(|| commit.to_string())
}
