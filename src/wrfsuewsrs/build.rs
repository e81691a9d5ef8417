// wrfsuewsrs/build.rs

fn main() {
    let crate_env_name = "WRFSUEWSRS_CLI_VERSION";
    let version = std::env::var("CARGO_PKG_VERSION").unwrap();
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    let local_hash = get_git_hash(".").unwrap_or_else(|| "unknown".to_string());
    let local_dirty = check_git_dirty_current().unwrap_or("");

    let full_version = format!("{} {}{}-{}", version, local_hash, local_dirty, profile);
    println!("cargo:rustc-env={}={}", crate_env_name, full_version);

    // Tell cargo to rerun if the repository state changes
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/HEAD");
}

fn get_git_hash(git_dir: &str) -> Option<String> {
    let output = std::process::Command::new("git")
        .args(&["-C", git_dir, "rev-parse", "HEAD"])
        .output()
        .ok()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("bad revision 'HEAD'") || stderr.contains("ambiguous argument 'HEAD'") {
            return Some("no-commits".to_string());
        }
        return None;
    }

    let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();

    // Ensure we got a real hash, not just "HEAD"
    if hash == "HEAD" || hash.is_empty() || hash.len() < 8 {
        return Some("no-commits".to_string());
    }

    if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Some("no-commits".to_string());
    }

    Some(hash[..8].to_string())
}

fn check_git_dirty_current() -> Option<&'static str> {
    let status = std::process::Command::new("git")
        .args(&["diff", "--quiet", "."])
        .status()
        .ok()?;

    Some(if status.success() { "" } else { "-dirty" })
}
