use std::process::Command;

use chrono::Utc;

fn main() {
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/");

    let version = env!("CARGO_PKG_VERSION");
    let version_string = match git_short_hash() {
        Some(hash) if !is_tagged_release(version) => {
            let built = Utc::now().format("%Y%m%d");
            format!("{version}+{hash}.{built}")
        }
        _ => version.to_owned(),
    };

    println!("cargo:rustc-env=IMPERATIVE_VERSION={version_string}");
}

fn git_output(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8(output.stdout).ok())
        .flatten()
}

fn git_short_hash() -> Option<String> {
    git_output(&["rev-parse", "--short", "HEAD"]).map(|hash| hash.trim().to_owned())
}

fn is_tagged_release(version: &str) -> bool {
    let expected_tag = format!("imperative-cli@v{version}");
    git_output(&["tag", "--points-at", "HEAD"])
        .is_some_and(|tags| tags.lines().any(|line| line.trim() == expected_tag))
}
