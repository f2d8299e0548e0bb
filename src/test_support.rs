//! Stand-in build tools for tests that spawn child processes.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable `/bin/sh` script at `path`.
pub fn write_script(path: &Path, body: &str) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, format!("#!/bin/sh\n{body}")).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    path.to_path_buf()
}

/// `msbuild` in `dir` that appends `msbuild <args>` to `log`, records its
/// `PATH` in `dir/path.log`, prints one line per stream, then exits with `code`.
pub fn write_fake_msbuild(dir: &Path, log: &Path, code: i32) -> PathBuf {
    write_script(
        &dir.join("msbuild"),
        &format!(
            "echo \"msbuild $@\" >> \"{log}\"\n\
             echo \"$PATH\" > \"{path_log}\"\n\
             echo building\n\
             echo broken >&2\n\
             exit {code}\n",
            log = log.display(),
            path_log = dir.join("path.log").display(),
        ),
    )
}

/// Packager at `path` that appends `package-editor <args>` to `log` and exits with `code`.
pub fn write_fake_packager(path: &Path, log: &Path, code: i32) -> PathBuf {
    write_script(
        path,
        &format!(
            "echo \"package-editor $@\" >> \"{log}\"\nexit {code}\n",
            log = log.display()
        ),
    )
}

/// Lines of `log`, or none when nothing was spawned.
pub fn logged_calls(log: &Path) -> Vec<String> {
    fs::read_to_string(log)
        .map(|text| text.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
