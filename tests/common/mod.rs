#![allow(dead_code)]
use assert_fs::{TempDir, prelude::*};

/// Writes `contents` at `rel`, creating parent directories.
pub fn write(
    td: &TempDir,
    rel: &str,
    contents: &str,
) {
    let child = td.child(rel);
    if let Some(parent) = child.path().parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    child.write_str(contents).unwrap();
}

/// Builds a fixture site:
/// root/
///   _index.md             (one region)
///   posts/a/_index.md     (two regions)
///   posts/b/_index.md     (no markers)
///   posts/b/other.md      (markers, but not a source document)
///   .hidden/_index.md     (skipped unless --no-ignore)
pub fn site_fs() -> TempDir {
    let td = TempDir::new().unwrap();
    write(&td, "_index.md", "Hello <cn>你好</cn>world\n");
    write(&td, "posts/a/_index.md", "A<cn>B</cn>C<cn>D</cn>E");
    write(&td, "posts/b/_index.md", "no markers here");
    write(&td, "posts/b/other.md", "<cn>not a source</cn>");
    write(&td, ".hidden/_index.md", "H<cn>h</cn>");
    td
}
