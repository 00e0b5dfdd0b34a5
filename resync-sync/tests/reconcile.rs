//! Scan/apply behaviour over realistic upstream and local trees.

use std::fs;
use std::path::{Path, PathBuf};

use resync_core::{ChangeStatus, RuleSet, SyncConfig};
use resync_sync::{apply_batch, scan, ChangeSet, Selection};
use rstest::rstest;
use tempfile::TempDir;

struct Trees {
    _tmp: TempDir,
    upstream: PathBuf,
    local: PathBuf,
}

impl Trees {
    fn new() -> Self {
        let tmp = TempDir::new().expect("tmp");
        let upstream = tmp.path().join("upstream");
        let local = tmp.path().join("local");
        fs::create_dir_all(&upstream).expect("mkdir upstream");
        fs::create_dir_all(&local).expect("mkdir local");
        Self {
            _tmp: tmp,
            upstream,
            local,
        }
    }

    fn upstream(&self, relative: &str, content: &str) {
        write(&self.upstream.join(relative), content);
    }

    fn local(&self, relative: &str, content: &str) {
        write(&self.local.join(relative), content);
    }

    fn scan(&self) -> ChangeSet {
        scan(&self.upstream, &self.local, "rs", &default_rules()).expect("scan")
    }
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, content).expect("write");
}

fn default_rules() -> RuleSet {
    SyncConfig::default().rule_set().expect("default rules")
}

fn five_new_files() -> Trees {
    let trees = Trees::new();
    for name in ["a.rs", "b.rs", "c.rs", "d.rs", "e.rs"] {
        trees.upstream(name, &format!("// {name}\nuse cocoindex_utils::x;\n"));
    }
    trees
}

#[test]
fn identical_files_are_never_reported() {
    let trees = Trees::new();
    trees.upstream("mod.rs", "use cocoindex_utils::a;\nuse cocoindex_extra_text::b;\n");
    trees.local("mod.rs", "use recoco_utils::a;\nuse recoco_splitters::b;\n");
    trees.upstream("plain.rs", "fn plain() {}\n");
    trees.local("plain.rs", "fn plain() {}\n");

    assert!(trees.scan().is_empty());
}

#[test]
fn untracked_extensions_and_local_only_files_are_ignored() {
    let trees = Trees::new();
    trees.upstream("README.md", "docs\n");
    trees.upstream("build.rs.bak", "old\n");
    trees.local("local_only.rs", "fn mine() {}\n");

    assert!(trees.scan().is_empty());
}

#[test]
fn applying_index_two_touches_only_that_file() {
    let trees = five_new_files();
    // Every other position already has stale local content.
    for name in ["a.rs", "b.rs", "d.rs", "e.rs"] {
        trees.local(name, &format!("// {name}\nstale local edit\n"));
    }
    let set = trees.scan();
    assert_eq!(set.len(), 5);
    let statuses: Vec<_> = set.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            ChangeStatus::Modified,
            ChangeStatus::Modified,
            ChangeStatus::New,
            ChangeStatus::Modified,
            ChangeStatus::Modified,
        ]
    );
    let before: Vec<Vec<u8>> = ["a.rs", "b.rs", "d.rs", "e.rs"]
        .iter()
        .map(|name| fs::read(trees.local.join(name)).expect("read"))
        .collect();

    let report = apply_batch(&set, &Selection::Indices(vec![2]), &default_rules()).expect("apply");
    assert_eq!(report.written, vec![trees.local.join("c.rs")]);

    let after: Vec<Vec<u8>> = ["a.rs", "b.rs", "d.rs", "e.rs"]
        .iter()
        .map(|name| fs::read(trees.local.join(name)).expect("read"))
        .collect();
    assert_eq!(before, after, "unselected files must be byte-unchanged");
    assert_eq!(
        fs::read_to_string(trees.local.join("c.rs")).expect("read"),
        "// c.rs\nuse recoco_utils::x;\n"
    );
}

#[test]
fn modified_becomes_identical_after_apply() {
    let trees = Trees::new();
    trees.upstream("functions/split.rs", "use cocoindex_extra_text::split;\nfn v2() {}\n");
    trees.local("functions/split.rs", "use recoco_splitters::split;\nfn v1() {}\n");

    let before = trees.scan();
    assert_eq!(before.len(), 1);
    assert_eq!(before.records()[0].status, ChangeStatus::Modified);

    apply_batch(&before, &Selection::All, &default_rules()).expect("apply");
    assert!(trees.scan().is_empty());
}

#[test]
fn new_file_lands_with_its_parent_directories() {
    let trees = Trees::new();
    trees.upstream("targets/neo4j/mod.rs", "pub mod neo4j;\n");

    let set = trees.scan();
    assert_eq!(set.records()[0].status, ChangeStatus::New);
    apply_batch(&set, &Selection::All, &default_rules()).expect("apply");
    assert!(trees.local.join("targets/neo4j/mod.rs").is_file());
}

#[test]
fn repeated_scans_produce_the_same_snapshot() {
    let trees = five_new_files();
    trees.upstream("nested/z.rs", "z\n");
    trees.local("b.rs", "stale\n");

    let first = trees.scan();
    let second = trees.scan();
    assert_eq!(first.fingerprint(), second.fingerprint());
    let paths: Vec<_> = first.iter().map(|r| r.relative_path.clone()).collect();
    let again: Vec<_> = second.iter().map(|r| r.relative_path.clone()).collect();
    assert_eq!(paths, again);
    assert_eq!(first.records()[1].status, ChangeStatus::Modified);
    assert_eq!(first.records()[5].relative_path, PathBuf::from("nested/z.rs"));
}

#[rstest]
#[case::all(Selection::All, 5)]
#[case::subset(Selection::Indices(vec![0, 4]), 2)]
#[case::duplicate(Selection::Indices(vec![1, 1]), 2)]
fn selection_controls_how_many_writes_happen(#[case] selection: Selection, #[case] expected: usize) {
    let trees = five_new_files();
    let set = trees.scan();
    let report = apply_batch(&set, &selection, &default_rules()).expect("apply");
    assert_eq!(report.written.len(), expected);
}

#[test]
fn out_of_range_selection_leaves_local_tree_untouched() {
    let trees = five_new_files();
    let set = trees.scan();
    let err = apply_batch(&set, &Selection::Indices(vec![0, 9]), &default_rules())
        .expect_err("9 is out of range");
    assert!(err.to_string().contains("index 9 is out of range"));
    assert_eq!(
        fs::read_dir(&trees.local).expect("read_dir").count(),
        0,
        "nothing may be written"
    );
}
