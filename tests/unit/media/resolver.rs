use super::*;

fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"").unwrap();
}

#[test]
fn finds_file_case_insensitively_in_nested_folder() {
    let dir = tempfile::tempdir().unwrap();
    let clip = dir.path().join("day1").join("cam a").join("A001.MOV");
    touch(&clip);

    let resolver = DirectoryResolver::new([dir.path()]);
    assert_eq!(resolver.resolve("a001.mov"), Resolution::Found(clip.clone()));
    // Paths from another machine are matched by file name.
    assert_eq!(
        resolver.resolve("C:\\Projects\\a001.mov"),
        Resolution::Found(clip)
    );
}

#[test]
fn earlier_folder_wins() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    touch(&second.path().join("b.wav"));
    let in_first = first.path().join("b.wav");
    touch(&in_first);

    let resolver = DirectoryResolver::new([first.path(), second.path()]);
    assert_eq!(resolver.resolve("b.wav"), Resolution::Found(in_first));
}

#[test]
fn several_matches_are_ambiguous() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("x").join("c.mov"));
    touch(&dir.path().join("y").join("C.mov"));

    let resolver = DirectoryResolver::new([dir.path()]);
    match resolver.resolve("c.mov") {
        Resolution::Ambiguous(paths) => assert_eq!(paths.len(), 2),
        other => panic!("expected ambiguity, got {other:?}"),
    }
}

#[test]
fn missing_and_depth_limited() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("deep").join("d.mov"));

    let resolver = DirectoryResolver::new([dir.path()]);
    assert_eq!(resolver.resolve("nothing.mov"), Resolution::Missing);
    assert_eq!(resolver.resolve(""), Resolution::Missing);

    let shallow = DirectoryResolver::new([dir.path()]).with_max_depth(1);
    assert_eq!(shallow.resolve("d.mov"), Resolution::Missing);
}
