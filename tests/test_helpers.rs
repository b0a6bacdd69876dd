use assert_cmd::Command;
use std::path::Path;

/// Creates a `Command` for the `moodiary` binary with a clean environment
/// pointing at `entries_dir`. Additional arguments can be added by the caller.
pub fn base_moodiary_command(entries_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("moodiary").expect("moodiary binary not built");
    configure_moodiary_command(&mut cmd, entries_dir);
    cmd
}

/// Applies the standard non-interactive environment to an existing `Command`.
pub fn configure_moodiary_command(cmd: &mut Command, entries_dir: &Path) {
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
    }
    if let Ok(tmpdir) = std::env::var("TMPDIR") {
        cmd.env("TMPDIR", tmpdir);
    }
    cmd.env("HOME", entries_dir);
    cmd.env("MOODIARY_DIR", entries_dir);
}
