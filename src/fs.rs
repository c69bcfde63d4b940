//! Blocking file helpers that attach the path to every error.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

pub(crate) fn create_dir_all(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::create_dir_all(path).context(format!("Unable to create directory {}", path.display()))
}

pub(crate) fn file(path: impl AsRef<Path>) -> Result<std::fs::File> {
    let path = path.as_ref();
    std::fs::File::create(path).context(format!("Unable to create file {}", path.display()))
}

pub(crate) fn write_all(path: impl AsRef<Path>, data: impl IntoIterator<Item = u8>) -> Result<()> {
    let path = path.as_ref();
    let mut f = file(path)?;
    let buf: Vec<u8> = data.into_iter().collect();
    f.write_all(&buf)
        .context(format!("Unable to write data to {}", path.display()))?;
    f.sync_all()
        .context(format!("Unable to flush data to {}", path.display()))
}

pub(crate) fn read_to_string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).context(format!("Unable to read file {}", path.display()))
}

pub(crate) fn rename(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
    let (from, to) = (from.as_ref(), to.as_ref());
    std::fs::rename(from, to).with_context(|| {
        format!(
            "Unable to move file from '{}' to '{}'",
            from.display(),
            to.display()
        )
    })
}

#[test]
fn write_then_read_test() {
    let tempdir = tempfile::TempDir::new().unwrap();
    let dir = tempdir.path().join("a").join("b");
    create_dir_all(&dir).unwrap();
    let from = dir.join("x.tmp");
    let to = dir.join("x.json");
    write_all(&from, "[]".bytes()).unwrap();
    rename(&from, &to).unwrap();
    assert!(!from.exists());
    assert_eq!(read_to_string(&to).unwrap(), "[]");
}

#[test]
fn read_missing_file_test() {
    let tempdir = tempfile::TempDir::new().unwrap();
    let err = read_to_string(tempdir.path().join("nope.json")).unwrap_err();
    assert!(err.to_string().contains("nope.json"));
}
