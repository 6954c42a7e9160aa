//! Property-based tests for location normalization.
//!
//! These tests use proptest to generate random inputs and verify that
//! the normalization invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::scm::{fold_layout, ScmKind, ScmUrl};
    use proptest::prelude::*;

    /// Path segments that are not themselves layout markers.
    fn plain_segment() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,8}".prop_filter("not a layout marker", |s| {
            s != "trunk" && s != "branches"
        })
    }

    fn plain_path() -> impl Strategy<Value = String> {
        prop::collection::vec(plain_segment(), 1..5).prop_map(|segments| segments.join("/"))
    }

    proptest! {
        /// Property: folding removes exactly a trailing `trunk` segment.
        #[test]
        fn fold_removes_trunk_suffix(base in plain_path()) {
            prop_assert_eq!(fold_layout(&format!("{}/trunk", base)), base);
        }

        /// Property: folding removes exactly a trailing `branches/<name>` pair.
        #[test]
        fn fold_removes_branch_suffix(base in plain_path(), branch in plain_segment()) {
            prop_assert_eq!(fold_layout(&format!("{}/branches/{}", base, branch)), base);
        }

        /// Property: folding is idempotent.
        #[test]
        fn fold_is_idempotent(base in plain_path(), branch in plain_segment()) {
            for path in [
                base.clone(),
                format!("{}/trunk", base),
                format!("{}/branches/{}", base, branch),
            ] {
                let once = fold_layout(&path);
                prop_assert_eq!(fold_layout(&once), once);
            }
        }

        /// Property: a path without layout suffix folds to itself.
        #[test]
        fn fold_preserves_plain_paths(base in plain_path()) {
            prop_assert_eq!(fold_layout(&base), base);
        }

        /// Property: equivalence is invariant under transport choice, and
        /// reflexive/symmetric across the spellings of one repository.
        #[test]
        fn same_ignores_transport(host in "[a-z]{1,8}\\.(com|org)", path in plain_path()) {
            let https = ScmUrl::parse(ScmKind::Git, &format!("https://{}/{}.git", host, path)).unwrap();
            let ssh = ScmUrl::parse(ScmKind::Git, &format!("ssh://git@{}/{}", host, path)).unwrap();
            let scp = ScmUrl::parse(ScmKind::Git, &format!("git@{}:{}.git", host, path)).unwrap();

            prop_assert!(https.same(&https));
            prop_assert!(https.same(&ssh));
            prop_assert!(ssh.same(&https));
            // Transitivity across the chain.
            prop_assert!(ssh.same(&scp));
            prop_assert!(https.same(&scp));
            // Rendering differs even though identity agrees.
            prop_assert_ne!(https.url(), ssh.url());
        }

        /// Property: normalization is a fixed point; parsing a canonical
        /// rendering reproduces the same identity.
        #[test]
        fn canonical_rendering_roundtrips(host in "[a-z]{1,8}\\.(com|org)", path in plain_path()) {
            let url = ScmUrl::parse(ScmKind::Git, &format!("https://{}/{}", host, path)).unwrap();
            let reparsed = ScmUrl::parse(ScmKind::Git, &url.url()).unwrap();
            prop_assert_eq!(url, reparsed);
        }

        /// Property: a git suffix and a trailing slash never survive
        /// normalization.
        #[test]
        fn normalized_path_has_no_decorations(host in "[a-z]{1,8}\\.com", path in plain_path()) {
            let url = ScmUrl::parse(ScmKind::Git, &format!("https://{}/{}.git/", host, path)).unwrap();
            prop_assert!(!url.path().ends_with(".git"));
            prop_assert!(!url.path().ends_with('/'));
            prop_assert!(!url.path().starts_with('/'));
        }

        /// Property: Subversion identities are invariant across the
        /// trunk/branches spellings of one project.
        #[test]
        fn svn_layout_spellings_share_identity(
            host in "svn\\.[a-z]{1,8}\\.org",
            base in plain_path(),
            branch in plain_segment(),
        ) {
            let trunk =
                ScmUrl::parse(ScmKind::Subversion, &format!("https://{}/{}/trunk", host, base)).unwrap();
            let branched = ScmUrl::parse(
                ScmKind::Subversion,
                &format!("https://{}/{}/branches/{}", host, base, branch),
            )
            .unwrap();
            prop_assert!(trunk.same(&branched));
            prop_assert_eq!(trunk.url(), branched.url());
        }
    }
}
