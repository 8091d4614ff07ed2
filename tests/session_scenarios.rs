use deskfs::config::{DEFAULT_WORKSPACE, SeedConfig};
use deskfs::filesystem::{ErrorKind, FileTree};
use deskfs::session::Session;
use deskfs::shell::{self, Output};
use futures::StreamExt;
use rstest::*;

#[fixture]
fn nested() -> FileTree {
    let mut tree = FileTree::new();
    for dir in ["/a", "/a/b", "/a/b/deep", "/a/c"] {
        tree.mkdir(dir).unwrap();
    }
    for file in ["/a/b/one.txt", "/a/b/deep/two.txt"] {
        tree.touch(file).unwrap();
        tree.update_file(file, file).unwrap();
    }
    tree
}

#[test]
fn create_write_rename_read() {
    let mut tree = FileTree::new();
    tree.mkdir("/proj").unwrap();
    tree.touch("/proj/a.txt").unwrap();
    tree.update_file("/proj/a.txt", "hello").unwrap();
    tree.mv("/proj/a.txt", "/proj/b.txt").unwrap();

    assert_eq!(tree.cat("/proj/b.txt").unwrap(), "hello");
    assert_eq!(tree.cat("/proj/a.txt").unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(tree.search("/proj", "ell").unwrap(), vec!["/proj/b.txt"]);
}

#[test]
fn duplicate_mkdir_is_rejected() {
    let mut tree = FileTree::new();
    tree.mkdir("/x").unwrap();
    assert_eq!(tree.mkdir("/x").unwrap_err().kind(), ErrorKind::AlreadyExists);
}

#[rstest]
fn moving_a_directory_keeps_its_structure(mut nested: FileTree) {
    let before = nested.walk_tree("/a/b").unwrap();
    nested.mv("/a/b", "/a/c/b").unwrap();

    assert!(nested.stat("/a/c/b").unwrap().is_directory);
    assert_eq!(nested.stat("/a/b").unwrap_err().kind(), ErrorKind::NotFound);
    let after = nested.walk_tree("/a/c/b").unwrap();
    assert_eq!(before.len(), after.len());
    for (old, new) in before.iter().zip(&after) {
        assert_eq!(old.depth, new.depth);
        assert_eq!(old.entry, new.entry);
        assert_eq!(new.path, old.path.replacen("/a/b", "/a/c/b", 1));
    }
    assert_eq!(nested.cat("/a/c/b/deep/two.txt").unwrap(), "/a/b/deep/two.txt");
}

#[rstest]
fn moving_a_directory_under_itself_changes_nothing(mut nested: FileTree) {
    let snapshot = nested.walk_tree("/").unwrap();
    let version = nested.version();
    assert_eq!(
        nested.mv("/a", "/a/sub").unwrap_err().kind(),
        ErrorKind::InvalidOperation
    );
    assert_eq!(nested.walk_tree("/").unwrap(), snapshot);
    assert_eq!(nested.version(), version);
}

#[rstest]
fn removing_a_directory_removes_every_descendant(mut nested: FileTree) {
    let descendants = nested
        .walk_tree("/a")
        .unwrap()
        .into_iter()
        .map(|row| row.path)
        .collect::<Vec<_>>();
    nested.rm("/a").unwrap();
    for path in descendants.iter().map(String::as_str).chain(["/a"]) {
        assert_eq!(nested.stat(path).unwrap_err().kind(), ErrorKind::NotFound);
    }
    assert!(nested.ls("/").unwrap().is_empty());
}

#[compio::test]
async fn subscribers_follow_the_editor_save_cycle() {
    let mut session = Session::new(DEFAULT_WORKSPACE).unwrap();
    let versions = session.fs_mut().subscribe();

    for line in ["touch main.js", r#"write main.js "let x = 1;""#, "cat missing.js", "rm main.js"] {
        let _ = shell::run_line(&mut session, line);
    }
    drop(session);

    assert_eq!(versions.collect::<Vec<_>>().await, vec![2, 3, 4]);
}

#[test]
fn seeded_session_serves_the_editor() {
    let seed: SeedConfig = r#"
tree:
  vscode:
    index.html: "<h1>hi</h1>"
    styles:
      site.css: "h1 { color: red; }"
"#
    .try_into()
    .unwrap();
    let mut session = Session::from_seed(&seed).unwrap();

    let opened = shell::run_line(&mut session, "open styles/site.css")
        .unwrap()
        .unwrap();
    assert!(matches!(
        opened,
        Output::Opened { ref content, .. } if content == "h1 { color: red; }"
    ));
    assert_eq!(
        shell::run_line(&mut session, "search / red").unwrap(),
        Some(Output::Paths(vec!["/vscode/styles/site.css".to_string()]))
    );
}
