//! Property-based tests for manifest construction and preparation.
//!
//! These tests use proptest to generate package names and plugin lists and
//! verify that invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    use crate::config::ReleaseConfig;
    use crate::discovery::plugin_name;
    use crate::manifest::{build_manifest, dependency_map, DependencyMap};
    use crate::prepare::prepare;
    use proptest::prelude::*;
    use semver::Version;
    use tempfile::TempDir;

    fn package_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,15}"
    }

    // ============================================================================
    // build_manifest property tests
    // ============================================================================

    proptest! {
        /// Property: build_manifest is deterministic
        #[test]
        fn build_manifest_is_deterministic(name in package_name(), range in "\\^[0-9]\\.[0-9]\\.[0-9]") {
            let config = ReleaseConfig::default();
            let version = Version::new(1, 2, 3);
            let first = build_manifest(&config, &name, dependency_map([("rxjs", range.as_str())]), DependencyMap::new(), &version);
            let second = build_manifest(&config, &name, dependency_map([("rxjs", range.as_str())]), DependencyMap::new(), &version);
            prop_assert_eq!(first, second);
        }

        /// Property: building package A never changes what package B gets
        #[test]
        fn build_manifest_has_no_cross_package_contamination(
            a in package_name(),
            b in package_name(),
            dep in package_name(),
        ) {
            let config = ReleaseConfig::default();
            let version = Version::new(1, 0, 0);
            let b_before = build_manifest(&config, &b, DependencyMap::new(), DependencyMap::new(), &version);

            let mut a_manifest = build_manifest(&config, &a, DependencyMap::new(), dependency_map([(dep.as_str(), "latest")]), &version);
            a_manifest["repository"]["url"] = serde_json::json!("mutated");

            let b_after = build_manifest(&config, &b, DependencyMap::new(), DependencyMap::new(), &version);
            prop_assert_eq!(b_before, b_after);
        }

        /// Property: the scoped name always ends with the package name
        #[test]
        fn build_manifest_name_is_scoped(name in package_name()) {
            let config = ReleaseConfig::default();
            let manifest = build_manifest(&config, &name, DependencyMap::new(), DependencyMap::new(), &Version::new(0, 1, 0));
            prop_assert_eq!(manifest["name"].as_str().unwrap(), format!("{}/{}", config.scope, name));
        }
    }

    // ============================================================================
    // plugin_name property tests
    // ============================================================================

    proptest! {
        /// Property: the name is the directory holding the entry file
        #[test]
        fn plugin_name_is_parent_segment(
            prefix in proptest::collection::vec("[a-z]{1,8}", 0..4),
            name in package_name(),
        ) {
            let mut path = PathBuf::from("/");
            for segment in &prefix {
                path.push(segment);
            }
            path.push(&name);
            path.push("index.ts");
            prop_assert_eq!(plugin_name(&path).unwrap(), name);
        }
    }

    // ============================================================================
    // publish set property tests
    // ============================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: exactly the allow-listed plugins are published
        #[test]
        fn publish_set_matches_allow_list(
            names in proptest::collection::btree_set(package_name(), 0..6),
            pick in proptest::collection::vec(any::<bool>(), 6),
        ) {
            let names: Vec<String> = names.into_iter().filter(|n| n != "core").collect();
            let allowed: Vec<String> = names
                .iter()
                .zip(&pick)
                .filter(|(_, keep)| **keep)
                .map(|(n, _)| n.clone())
                .collect();

            let temp = TempDir::new().unwrap();
            let dist = temp.path().join("dist");
            let config = ReleaseConfig {
                publish_packages: allowed.clone(),
                ..ReleaseConfig::default()
            };
            let paths: Vec<PathBuf> = names
                .iter()
                .map(|n| PathBuf::from("/repo/plugins").join(n).join("index.ts"))
                .collect();

            let release = prepare(&config, &dist, &paths, &Version::new(1, 0, 0)).unwrap();

            let published: BTreeSet<PathBuf> = release.publish_set.into_iter().collect();
            let expected: BTreeSet<PathBuf> = allowed
                .iter()
                .map(|n| dist.join("plugins").join(n))
                .collect();
            prop_assert_eq!(published, expected);
            prop_assert_eq!(release.written.len(), 1 + 2 * names.len());
        }
    }
}
