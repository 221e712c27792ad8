use fsplit_core::container::descriptor::DESCRIPTOR_FILE;
use fsplit_core::error::FsplitError;
use fsplit_core::log::MemorySink;
use fsplit_core::{
    Context, MergeOptions, SplitOptions, collect_split_directories, merge_tree, split_tree,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;

fn tree(root: &Path) {
    fs::create_dir_all(root.join("music/live")).unwrap();
    fs::create_dir_all(root.join("private")).unwrap();
    fs::write(root.join("a.iso"), vec![1u8; 5000]).unwrap();
    fs::write(root.join("music/song.flac"), vec![2u8; 3000]).unwrap();
    fs::write(root.join("music/live/set.wav"), vec![3u8; 7000]).unwrap();
    fs::write(root.join("private/keys.db"), vec![4u8; 100]).unwrap();
}

#[test]
fn split_then_merge_whole_tree() {
    let tmp = tempfile::tempdir().unwrap();
    let root = fs::canonicalize(tmp.path()).unwrap();
    tree(&root);

    let opts = SplitOptions {
        chunk_size: 1024,
        remove_original: true,
        ..Default::default()
    };
    let ignore = vec![root.join("music/../private/keys.db")];
    let report = split_tree(&root, &ignore, &opts, &Context::default()).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.succeeded.len(), 3);
    assert!(root.join("private/keys.db").exists());
    assert!(!root.join("a.iso").exists());
    assert!(root.join("a").join(DESCRIPTOR_FILE).exists());

    let dirs = collect_split_directories(&root, &[]).unwrap();
    assert_eq!(
        dirs,
        vec![root.join("a"), root.join("music/song"), root.join("music/live/set")]
    );

    let report = merge_tree(
        &root,
        &[root.join("music/live")],
        &MergeOptions { remove_after: true },
        &Context::default(),
    )
    .unwrap();
    assert!(report.is_clean());
    assert_eq!(report.succeeded.len(), 2);
    assert_eq!(fs::read(root.join("a.iso")).unwrap(), vec![1u8; 5000]);
    assert_eq!(fs::read(root.join("music/song.flac")).unwrap(), vec![2u8; 3000]);
    assert!(!root.join("a").exists());
    // ignored subtree untouched
    assert!(root.join("music/live/set").join(DESCRIPTOR_FILE).exists());
    assert!(!root.join("music/live/set.wav").exists());
}

#[test]
fn one_bad_directory_does_not_stop_the_batch() {
    let tmp = tempfile::tempdir().unwrap();
    let root = fs::canonicalize(tmp.path()).unwrap();
    tree(&root);
    let opts = SplitOptions {
        parts: 2,
        remove_original: true,
        ..Default::default()
    };
    split_tree(&root, &[], &opts, &Context::default()).unwrap();

    // corrupt the first directory the walk will reach
    let part = root.join("a/a.iso.0.part");
    let mut raw = fs::read(&part).unwrap();
    raw[0] ^= 0x55;
    fs::write(&part, raw).unwrap();

    let sink = MemorySink::default();
    let ctx = Context::new(false, Arc::new(sink.clone()));
    let report = merge_tree(&root, &[], &MergeOptions::default(), &ctx).unwrap();

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, root.join("a"));
    assert!(matches!(report.failed[0].1, FsplitError::HashMismatch { .. }));
    assert_eq!(report.succeeded.len(), 3);
    assert_eq!(fs::read(root.join("private/keys.db")).unwrap(), vec![4u8; 100]);
    assert_eq!(sink.lines().len(), 1);
}

#[test]
fn bad_sizing_fails_before_walking() {
    let tmp = tempfile::tempdir().unwrap();
    tree(tmp.path());
    let opts = SplitOptions {
        parts: 2,
        chunk_size: 10,
        ..Default::default()
    };
    let err = split_tree(tmp.path(), &[], &opts, &Context::default()).unwrap_err();
    assert!(matches!(err, FsplitError::InvalidArguments(_)));
    assert!(tmp.path().join("a.iso").exists());
    assert!(!tmp.path().join("a").exists());
}

#[test]
fn missing_root() {
    let tmp = tempfile::tempdir().unwrap();
    let err = merge_tree(
        &tmp.path().join("gone"),
        &[],
        &MergeOptions::default(),
        &Context::default(),
    )
    .unwrap_err();
    assert!(matches!(err, FsplitError::MissingDirectory(_)));
}
