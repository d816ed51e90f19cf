//! Unit Tests for the repository locator

#[path = "../test_utils/mod.rs"]
mod test_utils;

use std::fs;

use gitview::{locate_repository_root, Error};
use tempfile::TempDir;
use test_utils::make_dirs;

#[test]
fn test_nested_directory_finds_nearest_root() {
    // A/.git, A/B/C: starting at C resolves to A
    let temp = TempDir::new().unwrap();
    let a = make_dirs(temp.path(), "A");
    fs::create_dir(a.join(".git")).unwrap();
    let c = make_dirs(temp.path(), "A/B/C");

    let root = locate_repository_root(&c).unwrap();
    assert_eq!(root, fs::canonicalize(&a).unwrap());
}

#[test]
fn test_inner_repository_wins() {
    let temp = TempDir::new().unwrap();
    let outer = make_dirs(temp.path(), "outer");
    fs::create_dir(outer.join(".git")).unwrap();
    let inner = make_dirs(temp.path(), "outer/vendor/inner");
    fs::create_dir(inner.join(".git")).unwrap();
    let deep = make_dirs(temp.path(), "outer/vendor/inner/src");

    assert_eq!(
        locate_repository_root(&deep).unwrap(),
        fs::canonicalize(&inner).unwrap()
    );
    assert_eq!(
        locate_repository_root(&outer.join("vendor")).unwrap(),
        fs::canonicalize(&outer).unwrap()
    );
}

#[test]
fn test_start_path_with_parent_components() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join(".git")).unwrap();
    let sub = make_dirs(temp.path(), "sub");

    let with_dots = sub.join("..").join("sub");
    assert_eq!(
        locate_repository_root(&with_dots).unwrap(),
        fs::canonicalize(temp.path()).unwrap()
    );
}

#[test]
fn test_no_repository_anywhere() {
    let temp = TempDir::new().unwrap();
    let dir = make_dirs(temp.path(), "plain/dir");

    // Only meaningful when the temp dir is not itself inside a repository
    if locate_repository_root(temp.path()).is_err() {
        match locate_repository_root(&dir) {
            Err(Error::RepositoryNotFound { path }) => assert_eq!(path, dir),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}

#[test]
fn test_missing_start_directory() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("gone");
    match locate_repository_root(&missing) {
        Err(Error::DirectoryNotFound { path }) => assert_eq!(path, missing),
        other => panic!("unexpected result: {:?}", other),
    }
}
