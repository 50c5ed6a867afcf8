//! Property-based tests for the argument-string merge.
//!
//! These tests use proptest to generate argument strings built from realistic
//! JVM-style tokens and verify that merge invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::merge::{merge_argument, ArgumentToken, ValueSyntax};
    use proptest::prelude::*;

    /// Dotted lowercase keys such as `com.ibm.mq.timeout`.
    fn key_strategy() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,6}(\\.[a-zA-Z][a-zA-Z0-9_]{0,6}){0,3}"
    }

    fn value_strategy() -> impl Strategy<Value = String> {
        "[0-9]{1,10}"
    }

    /// Tokens that never start with `-D`, so they cannot collide with a key.
    fn unrelated_token() -> impl Strategy<Value = String> {
        prop_oneof![
            "-X[a-z]{2,5}[0-9]{0,4}[mg]?",
            "-verbose:(gc|class|jni)",
            "[a-z]{1,5}=[a-z0-9]{1,5}",
            "-agentlib:[a-z]{3,6}",
        ]
    }

    fn separator() -> impl Strategy<Value = String> {
        prop_oneof![Just(" ".to_string()), Just("  ".to_string()), Just("\t".to_string())]
    }

    /// An argument string of unrelated tokens joined by mixed whitespace.
    fn argument_text() -> impl Strategy<Value = String> {
        prop::collection::vec((unrelated_token(), separator()), 0..6).prop_map(|parts| {
            let mut text = String::new();
            for (index, (token, sep)) in parts.into_iter().enumerate() {
                if index > 0 {
                    text.push_str(&sep);
                }
                text.push_str(&token);
            }
            text
        })
    }

    // ============================================================================
    // Idempotence
    // ============================================================================

    proptest! {
        /// Property: merging the same value twice equals merging it once
        #[test]
        fn merge_is_idempotent(text in argument_text(), key in key_strategy(), value in value_strategy()) {
            let once = merge_argument(&text, &key, &value).unwrap();
            let twice = merge_argument(&once, &key, &value).unwrap();
            prop_assert_eq!(once, twice);
        }

        /// Property: idempotence also holds when the key is already present
        #[test]
        fn merge_is_idempotent_over_existing_token(
            prefix in argument_text(),
            suffix in argument_text(),
            key in key_strategy(),
            old in value_strategy(),
            new in value_strategy(),
        ) {
            let text = format!("{} -D{}={} {}", prefix, key, old, suffix);
            let once = merge_argument(&text, &key, &new).unwrap();
            let twice = merge_argument(&once, &key, &new).unwrap();
            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(once, format!("{} -D{}={} {}", prefix, key, new, suffix));
        }

        /// Property: token syntax keeps idempotence for arbitrary single-token values
        #[test]
        fn token_syntax_is_idempotent(text in argument_text(), key in key_strategy(), value in "[a-zA-Z0-9_./:-]{0,12}") {
            let token = ArgumentToken::new(&key, ValueSyntax::Token).unwrap();
            let once = token.merge(&text, &value);
            let twice = token.merge(&once, &value);
            prop_assert_eq!(once, twice);
        }
    }

    // ============================================================================
    // Non-interference
    // ============================================================================

    proptest! {
        /// Property: merging one key leaves another key's token untouched
        #[test]
        fn merge_does_not_disturb_other_keys(
            text in argument_text(),
            k1 in key_strategy(),
            k2 in key_strategy(),
            v1 in value_strategy(),
            v2 in value_strategy(),
            new in value_strategy(),
        ) {
            prop_assume!(k1 != k2);
            let other = format!("-D{}={}", k2, v2);
            let base = format!("-D{}={} {} {}", k1, v1, text, other);
            let merged = merge_argument(&base, &k1, &new).unwrap();
            prop_assert!(merged.ends_with(&other), "{} lost {}", merged, other);

            let token = ArgumentToken::new(&k2, ValueSyntax::Digits).unwrap();
            prop_assert_eq!(token.current_value(&merged), Some(v2.as_str()));
        }

        /// Property: unrelated text is a prefix of the result on the append path
        #[test]
        fn append_preserves_existing_text(text in argument_text(), key in key_strategy(), value in value_strategy()) {
            let merged = merge_argument(&text, &key, &value).unwrap();
            prop_assert!(merged.starts_with(&text));
            prop_assert!(!merged.starts_with(' '));
            let suffix = format!("-D{}={}", key, value);
            prop_assert!(merged.ends_with(&suffix));
        }

        /// Property: after a merge exactly one token for the key is present
        #[test]
        fn merge_never_duplicates_token(text in argument_text(), key in key_strategy(), value in value_strategy()) {
            let merged = merge_argument(&text, &key, &value).unwrap();
            let needle = format!("-D{}=", key);
            let count = merged
                .split_whitespace()
                .filter(|token| token.starts_with(&needle))
                .count();
            prop_assert_eq!(count, 1);
        }
    }
}
