//! Session controller shared by every `resync` verb.
//!
//! One run is `refresh mirror → scan → act`. `clean` short-circuits before
//! the mirror is touched; `--no-fetch` skips the refresh and scans whatever
//! the cache already holds.

use resync_core::{RuleSet, SyncPaths};
use resync_mirror::{Mirror, MirrorAction};

use crate::{
    applier::{apply_batch, ApplyReport},
    diff::{diff_records, FileDiff},
    scanner::scan,
    snapshot::{ChangeSet, Selection},
    SyncError,
};

/// What the operator asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    /// Delete the mirror cache.
    Clean,
    /// Print the numbered change list.
    Report,
    /// Write the selected records into the local tree.
    Apply(Selection),
    /// Show what applying the selected records would change.
    Diff(Selection),
}

/// Knobs that apply to every scanning verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Refresh (or clone) the mirror before scanning.
    pub fetch: bool,
    /// Snapshot id the operator reviewed; `Apply` refuses to run on a
    /// different scan.
    pub expected_snapshot: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            fetch: true,
            expected_snapshot: None,
        }
    }
}

/// Result of one [`run`].
#[derive(Debug)]
pub enum Outcome {
    Cleaned {
        removed: bool,
    },
    Reported {
        mirror: Option<MirrorAction>,
        change_set: ChangeSet,
    },
    Applied {
        mirror: Option<MirrorAction>,
        change_set: ChangeSet,
        report: ApplyReport,
    },
    Diffed {
        mirror: Option<MirrorAction>,
        change_set: ChangeSet,
        diffs: Vec<FileDiff>,
    },
}

/// Execute `verb` against the configured trees.
pub fn run(
    paths: &SyncPaths,
    extension: &str,
    rules: &RuleSet,
    mirror: &Mirror,
    verb: Verb,
    options: &RunOptions,
) -> Result<Outcome, SyncError> {
    let step = match verb {
        Verb::Clean => {
            let removed = mirror.purge()?;
            return Ok(Outcome::Cleaned { removed });
        }
        Verb::Report => ScanStep::Report,
        Verb::Apply(selection) => ScanStep::Apply(selection),
        Verb::Diff(selection) => ScanStep::Diff(selection),
    };

    let action = if options.fetch {
        Some(mirror.ensure_fresh()?)
    } else {
        tracing::info!("skipping upstream refresh; scanning existing cache");
        None
    };

    let change_set = scan(&paths.upstream_root, &paths.local_root, extension, rules)?;
    tracing::debug!(
        "scan found {} change(s), snapshot {}",
        change_set.len(),
        change_set.short_id()
    );

    match step {
        ScanStep::Report => Ok(Outcome::Reported {
            mirror: action,
            change_set,
        }),
        ScanStep::Apply(selection) => {
            if let Some(expected) = &options.expected_snapshot {
                if !change_set.matches_snapshot(expected) {
                    return Err(SyncError::SnapshotMismatch {
                        expected: expected.clone(),
                        actual: change_set.short_id().to_string(),
                    });
                }
            }
            let report = apply_batch(&change_set, &selection, rules)?;
            Ok(Outcome::Applied {
                mirror: action,
                change_set,
                report,
            })
        }
        ScanStep::Diff(selection) => {
            let diffs = diff_records(&change_set, &selection, rules)?;
            Ok(Outcome::Diffed {
                mirror: action,
                change_set,
                diffs,
            })
        }
    }
}

// Verbs that need a fresh scan.
enum ScanStep {
    Report,
    Apply(Selection),
    Diff(Selection),
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    use resync_core::{ChangeStatus, RuleSpec};
    use resync_mirror::{TransportError, VcsClient};
    use tempfile::TempDir;

    use super::*;

    /// Clones by copying a fixture directory; counts every call.
    struct CopyClient {
        source: PathBuf,
        calls: Rc<Cell<usize>>,
    }

    impl VcsClient for CopyClient {
        fn name(&self) -> &str {
            "copy"
        }

        fn clone_repo(&self, dest: &Path) -> Result<(), TransportError> {
            self.calls.set(self.calls.get() + 1);
            copy_tree(&self.source, dest);
            Ok(())
        }

        fn fetch_and_reset(&self, checkout: &Path) -> Result<(), TransportError> {
            self.calls.set(self.calls.get() + 1);
            fs::remove_dir_all(checkout).expect("reset cache");
            copy_tree(&self.source, checkout);
            Ok(())
        }
    }

    fn copy_tree(from: &Path, to: &Path) {
        fs::create_dir_all(to).expect("mkdir");
        for entry in fs::read_dir(from).expect("read_dir") {
            let entry = entry.expect("entry");
            let target = to.join(entry.file_name());
            if entry.file_type().expect("type").is_dir() {
                copy_tree(&entry.path(), &target);
            } else {
                fs::copy(entry.path(), target).expect("copy");
            }
        }
    }

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, content).expect("write");
    }

    struct Fixture {
        _tmp: TempDir,
        remote: PathBuf,
        paths: SyncPaths,
        calls: Rc<Cell<usize>>,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().expect("tmp");
            let remote = tmp.path().join("remote");
            write(&remote, "ops/mod.rs", "pub use cocoindex_utils::*;\n");
            write(&remote, "ops/sources/files.rs", "pub struct Files;\n");
            let cache_dir = tmp.path().join(".upstream_cache");
            let paths = SyncPaths {
                upstream_root: cache_dir.join("ops"),
                local_root: tmp.path().join("local"),
                cache_dir,
            };
            Self {
                _tmp: tmp,
                remote,
                paths,
                calls: Rc::new(Cell::new(0)),
            }
        }

        fn mirror(&self) -> Mirror {
            Mirror::new(
                &self.paths.cache_dir,
                Box::new(CopyClient {
                    source: self.remote.clone(),
                    calls: Rc::clone(&self.calls),
                }),
            )
        }

        fn run(&self, verb: Verb, options: &RunOptions) -> Result<Outcome, SyncError> {
            run(&self.paths, "rs", &rules(), &self.mirror(), verb, options)
        }
    }

    fn rules() -> RuleSet {
        RuleSet::from_specs(&[RuleSpec::new("cocoindex_utils", "recoco_utils")]).expect("rules")
    }

    #[test]
    fn report_clones_then_lists_new_files() {
        let fx = Fixture::new();
        let outcome = fx.run(Verb::Report, &RunOptions::default()).expect("run");
        match outcome {
            Outcome::Reported { mirror, change_set } => {
                assert_eq!(mirror, Some(MirrorAction::Cloned { via: "copy".into() }));
                let statuses: Vec<_> = change_set.iter().map(|r| r.status).collect();
                assert_eq!(statuses, vec![ChangeStatus::New, ChangeStatus::New]);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(fx.calls.get(), 1);
    }

    #[test]
    fn apply_all_then_report_is_clean() {
        let fx = Fixture::new();
        fx.run(Verb::Apply(Selection::All), &RunOptions::default())
            .expect("apply");
        assert_eq!(
            fs::read_to_string(fx.paths.local_root.join("mod.rs")).expect("read"),
            "pub use recoco_utils::*;\n"
        );

        match fx.run(Verb::Report, &RunOptions::default()).expect("report") {
            Outcome::Reported { mirror, change_set } => {
                assert_eq!(mirror, Some(MirrorAction::Refreshed));
                assert!(change_set.is_empty());
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn no_fetch_skips_the_mirror() {
        let fx = Fixture::new();
        let options = RunOptions {
            fetch: false,
            expected_snapshot: None,
        };
        match fx.run(Verb::Report, &options).expect("run") {
            Outcome::Reported { mirror, change_set } => {
                assert_eq!(mirror, None);
                assert!(change_set.is_upstream_missing());
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(fx.calls.get(), 0);
    }

    #[test]
    fn stale_snapshot_blocks_apply() {
        let fx = Fixture::new();
        let options = RunOptions {
            fetch: true,
            expected_snapshot: Some("000000000000".to_string()),
        };
        let err = fx
            .run(Verb::Apply(Selection::All), &options)
            .expect_err("snapshot differs");
        assert!(matches!(err, SyncError::SnapshotMismatch { .. }));
        assert!(!fx.paths.local_root.exists(), "nothing may be written");
    }

    #[test]
    fn matching_snapshot_allows_apply() {
        let fx = Fixture::new();
        let id = match fx.run(Verb::Report, &RunOptions::default()).expect("report") {
            Outcome::Reported { change_set, .. } => change_set.short_id().to_string(),
            other => panic!("unexpected outcome {other:?}"),
        };
        let options = RunOptions {
            fetch: true,
            expected_snapshot: Some(id),
        };
        match fx
            .run(Verb::Apply(Selection::Indices(vec![1])), &options)
            .expect("apply")
        {
            Outcome::Applied { report, .. } => {
                assert_eq!(
                    report.written,
                    vec![fx.paths.local_root.join("sources").join("files.rs")]
                );
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(!fx.paths.local_root.join("mod.rs").exists());
    }

    #[test]
    fn diff_writes_nothing() {
        let fx = Fixture::new();
        match fx
            .run(Verb::Diff(Selection::All), &RunOptions::default())
            .expect("diff")
        {
            Outcome::Diffed { diffs, .. } => assert_eq!(diffs.len(), 2),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(!fx.paths.local_root.exists());
    }

    #[test]
    fn clean_purges_without_contacting_upstream() {
        let fx = Fixture::new();
        match fx.run(Verb::Clean, &RunOptions::default()).expect("clean") {
            Outcome::Cleaned { removed } => assert!(!removed),
            other => panic!("unexpected outcome {other:?}"),
        }

        fx.run(Verb::Report, &RunOptions::default()).expect("clone");
        match fx.run(Verb::Clean, &RunOptions::default()).expect("clean") {
            Outcome::Cleaned { removed } => assert!(removed),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(!fx.paths.cache_dir.exists());
        assert_eq!(fx.calls.get(), 1);
    }
}
