//! Property-based tests for registry uniqueness and name allocation
//!
//! Random sequences of inserts and removals over a small pool of paths and
//! names, so collisions are common.

use proptest::prelude::*;
use sheetsync_core::SyncError;
use sheetsync_service::NameAllocator;
use sheetsync_service::registry::MappingRegistry;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
enum Op {
    Insert { data: usize, name: usize },
    Remove { data: usize },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..6usize, 0..6usize).prop_map(|(data, name)| Op::Insert { data, name }),
        1 => (0..6usize).prop_map(|data| Op::Remove { data }),
    ]
}

// Strategy: relative data paths over a tiny directory alphabet
fn data_path() -> impl Strategy<Value = PathBuf> {
    (
        prop::collection::vec(prop::sample::select(vec!["a", "b", "c"]), 0..4),
        prop::sample::select(vec!["items", "levels"]),
    )
        .prop_map(|(dirs, stem)| {
            let mut path: PathBuf = dirs.into_iter().collect();
            path.push(format!("{stem}.bytes"));
            path
        })
}

fn empty_registry(dir: &Path) -> MappingRegistry {
    MappingRegistry::load(dir.join("config.xml"), dir.join("excel")).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_registry_stays_one_to_one(ops in prop::collection::vec(op(), 1..20)) {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = empty_registry(dir.path());

        for op in ops {
            match op {
                Op::Insert { data, name } => {
                    let data_path = dir.path().join(format!("d{data}.bytes"));
                    let name = format!("s{name}.xlsx");
                    let path_taken = registry.get(&data_path).is_some();
                    let name_taken = registry.exists(&name);

                    match registry.insert(&data_path, &name) {
                        Ok(()) => prop_assert!(!path_taken && !name_taken),
                        Err(SyncError::DuplicateMapping { .. }) => prop_assert!(path_taken),
                        Err(SyncError::DuplicateSpreadsheet { .. }) => prop_assert!(name_taken),
                        Err(e) => prop_assert!(false, "unexpected error: {e}"),
                    }
                }
                Op::Remove { data } => {
                    let data_path = dir.path().join(format!("d{data}.bytes"));
                    let was_present = registry.get(&data_path).is_some();
                    let removed = registry.remove(&data_path).unwrap();
                    prop_assert_eq!(removed.is_some(), was_present);
                }
            }

            let all = registry.list_all();
            let paths: HashSet<_> = all.iter().map(|(p, _)| p.clone()).collect();
            let names: HashSet<_> = all.iter().map(|(_, n)| n.clone()).collect();
            prop_assert_eq!(paths.len(), all.len());
            prop_assert_eq!(names.len(), all.len());
        }

        let reloaded = empty_registry(dir.path());
        prop_assert_eq!(reloaded.list_all(), registry.list_all());
    }

    #[test]
    fn test_allocated_names_are_unused_and_deterministic(
        paths in prop::collection::vec(data_path(), 1..12),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = empty_registry(dir.path());

        for path in paths {
            let data_path = dir.path().join(path);
            if registry.get(&data_path).is_some() {
                continue;
            }

            let allocator = NameAllocator::new(&registry, "xlsx");
            let first = allocator.allocate(&data_path);
            let second = allocator.allocate(&data_path);
            match (first, second) {
                (Ok(a), Ok(b)) => {
                    prop_assert_eq!(&a, &b);
                    prop_assert!(!registry.exists(&a));
                    prop_assert!(a.ends_with(".xlsx"));
                    registry.insert(&data_path, &a).unwrap();
                }
                (Err(SyncError::NameResolution { .. }), Err(SyncError::NameResolution { .. })) => {}
                (a, b) => prop_assert!(false, "inconsistent allocation: {a:?} vs {b:?}"),
            }
        }
    }
}
