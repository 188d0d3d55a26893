//! Property-based tests for proxy config rewriting.
//!
//! These tests use proptest to generate branch name lists and templates and
//! verify that the rewrite invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::proxy::{rewrite, APPS_TOKEN, FIRST_APP_TOKEN};
    use proptest::prelude::*;

    fn branch_name() -> impl Strategy<Value = String> {
        "[a-z0-9][a-z0-9._-]{0,12}"
    }

    fn branch_names() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(branch_name(), 1..8)
    }

    /// Template text that never contains a token by accident.
    fn filler() -> impl Strategy<Value = String> {
        "[a-z {};/\n]{0,40}"
    }

    proptest! {
        /// Property: one location block per name, in input order
        #[test]
        fn rewrite_emits_one_block_per_name_in_order(names in branch_names()) {
            let template = format!("{APPS_TOKEN}\n{FIRST_APP_TOKEN}\n");
            let content = rewrite(&template, &names, "/app").unwrap();

            let blocks: Vec<&str> = content
                .lines()
                .filter(|line| line.starts_with("location /"))
                .collect();
            prop_assert_eq!(blocks.len(), names.len());

            for (block, name) in blocks.iter().zip(&names) {
                let expected_head = format!("location /{} {{", name);
                prop_assert_eq!(*block, expected_head.as_str());
            }
            for name in &names {
                let expected_alias = format!("alias /app/{};", name);
                prop_assert!(content.contains(&expected_alias));
            }
        }

        /// Property: the default token always becomes the first name
        #[test]
        fn rewrite_default_is_first_name(names in branch_names()) {
            let template = format!("{APPS_TOKEN}\ndefault={FIRST_APP_TOKEN}\n");
            let content = rewrite(&template, &names, "/app").unwrap();
            let expected = format!("default={}\n", names[0]);
            prop_assert!(content.ends_with(&expected));
        }

        /// Property: no token survives a rewrite
        #[test]
        fn rewrite_leaves_no_tokens(
            names in branch_names(),
            head in filler(),
            middle in filler(),
            tail in filler(),
        ) {
            let template = format!("{head}{APPS_TOKEN}{middle}{FIRST_APP_TOKEN}{tail}");
            let content = rewrite(&template, &names, "/app").unwrap();
            prop_assert!(!content.contains(APPS_TOKEN));
            prop_assert!(!content.contains(FIRST_APP_TOKEN));
        }

        /// Property: text around the tokens is preserved exactly
        #[test]
        fn rewrite_preserves_surrounding_text(
            names in branch_names(),
            head in filler(),
            tail in filler(),
        ) {
            let template = format!("{head}{APPS_TOKEN}|{FIRST_APP_TOKEN}{tail}");
            let content = rewrite(&template, &names, "/app").unwrap();
            prop_assert!(content.starts_with(&head));
            let expected_tail = format!("|{}{}", names[0], tail);
            prop_assert!(content.ends_with(&expected_tail));
        }

        /// Property: an empty branch list is an error, never a panic
        #[test]
        fn rewrite_empty_names_is_error(head in filler()) {
            let template = format!("{head}{APPS_TOKEN}{FIRST_APP_TOKEN}");
            let names: Vec<String> = Vec::new();
            prop_assert!(rewrite(&template, &names, "/app").is_err());
        }
    }
}
