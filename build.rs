fn main() {
    // CI sets TASKPAD_VERSION (e.g., "version-abc1234"); otherwise derive from git.
    println!("cargo:rerun-if-env-changed=TASKPAD_VERSION");
    if let Ok(version) = std::env::var("TASKPAD_VERSION") {
        println!("cargo:rustc-env=TASKPAD_VERSION={version}");
        return;
    }

    let hash = std::process::Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .unwrap_or_default()
        .trim()
        .to_string();

    let version = if hash.is_empty() {
        env!("CARGO_PKG_VERSION").to_string()
    } else {
        format!("{}-{hash}", env!("CARGO_PKG_VERSION"))
    };
    println!("cargo:rustc-env=TASKPAD_VERSION={version}");
}
