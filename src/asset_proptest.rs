//! Property-based tests for asset path classification.
//!
//! These tests use proptest to generate asset paths and verify that the
//! classification invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::asset::{is_project_segment, Asset, Layout};
    use proptest::prelude::*;
    use std::path::Path;

    fn token() -> impl Strategy<Value = String> {
        "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}"
    }

    /// Ordinary path segments; `x` and `_` keep them from ever holding a token.
    fn segment() -> impl Strategy<Value = String> {
        "[a-zA-Z_.]{1,6}x"
    }

    fn layout() -> Layout {
        Layout::new(Path::new("assets/input"), false)
    }

    // ============================================================================
    // Project-scoped classification
    // ============================================================================

    proptest! {
        /// Property: a token segment at the project depth becomes the project id
        /// and is stripped, with everything before it, from the repository path
        #[test]
        fn token_segment_becomes_project_id(
            prefix in "[A-Za-z0-9_]{0,12}_",
            token in token(),
            rest in prop::collection::vec(segment(), 1..4),
        ) {
            let project = format!("{}{}", prefix, token);
            let path = format!("assets/input/{}/{}", project, rest.join("/"));
            let asset = Asset::classify(&path, &layout()).unwrap();

            prop_assert_eq!(asset.project_id(), Some(project.as_str()));
            prop_assert_eq!(asset.repo_path(), rest.join("/"));
            prop_assert!(!asset.repo_path().contains(&token));
        }

        /// Property: scoped assets apply to exactly one repository name
        #[test]
        fn scoped_asset_applies_only_to_its_project(
            token in token(),
            other in segment(),
        ) {
            let project = format!("ST2M2_group_{}", token);
            let path = format!("assets/input/{}/File.java", project);
            let asset = Asset::classify(&path, &layout()).unwrap();

            prop_assert!(asset.applies_to(&project));
            prop_assert!(!asset.applies_to(&other));
        }
    }

    // ============================================================================
    // Shared classification
    // ============================================================================

    proptest! {
        /// Property: paths too short to hold a project directory are shared
        #[test]
        fn short_paths_are_shared(name in "[a-zA-Z0-9_.-]{0,39}[a-zA-Z0-9_-]") {
            let path = format!("assets/input/{}", name);
            let asset = Asset::classify(&path, &layout()).unwrap();

            prop_assert!(asset.is_shared());
            prop_assert_eq!(asset.repo_path(), name.as_str());
        }

        /// Property: paths without a token keep every segment below the root
        #[test]
        fn shared_paths_keep_segments(segments in prop::collection::vec(segment(), 1..6)) {
            let path = format!("assets/input/{}", segments.join("/"));
            let asset = Asset::classify(&path, &layout()).unwrap();

            prop_assert!(asset.is_shared());
            prop_assert_eq!(asset.repo_path(), segments.join("/"));
        }

        /// Property: shared assets apply to every repository
        #[test]
        fn shared_assets_apply_everywhere(name in ".{0,30}") {
            let asset = Asset::classify("assets/input/README.md", &layout()).unwrap();
            prop_assert!(asset.applies_to(&name));
        }

        /// Property: uppercase tokens never count as project segments
        #[test]
        fn uppercase_tokens_are_ordinary(token in "[0-9A-F]{8}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{4}-[0-9A-F]{11}[A-F]") {
            prop_assert!(!is_project_segment(&token));
        }

        /// Property: how the root is spelled does not change the classification
        #[test]
        fn root_spelling_is_irrelevant(
            dots in prop::collection::vec(prop::bool::ANY, 3),
            segments in prop::collection::vec(segment(), 1..4),
        ) {
            let sep = |doubled: bool| if doubled { "//" } else { "/" };
            let root = format!(
                "{}assets{}input{}",
                if dots[0] { "./" } else { "" },
                sep(dots[1]),
                if dots[2] { "/" } else { "" },
            );
            let path = format!("assets/input/{}", segments.join("/"));
            let spelled = Asset::classify(&path, &Layout::new(Path::new(&root), false)).unwrap();
            let plain = Asset::classify(&path, &layout()).unwrap();
            prop_assert_eq!(spelled.repo_path(), plain.repo_path());
            prop_assert_eq!(spelled.project_id(), plain.project_id());
        }

        /// Property: classification is deterministic
        #[test]
        fn classification_is_deterministic(segments in prop::collection::vec("[a-z0-9-]{1,40}", 1..5)) {
            let path = format!("assets/input/{}", segments.join("/"));
            let first = Asset::classify(&path, &layout()).unwrap();
            let second = Asset::classify(&path, &layout()).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
