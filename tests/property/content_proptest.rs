//! Property-based tests for message content rules

use parley::backend::messaging::send_message;
use parley::shared::event::SendMessagePayload;
use parley::shared::message::{validate_content, MAX_CONTENT_CHARS};
use proptest::prelude::*;

use crate::common::TestApp;

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #[test]
    fn test_content_within_bounds_is_accepted(content in "\\PC{1,200}") {
        prop_assert_eq!(validate_content(&content).unwrap(), content.as_str());
    }

    #[test]
    fn test_content_over_limit_is_rejected(extra in 1usize..50, ch in any::<char>()) {
        let content: String = std::iter::repeat(ch).take(MAX_CONTENT_CHARS + extra).collect();
        prop_assert!(validate_content(&content).is_err());
    }

    #[test]
    fn test_content_at_limit_is_accepted(ch in any::<char>()) {
        let content: String = std::iter::repeat(ch).take(MAX_CONTENT_CHARS).collect();
        prop_assert!(validate_content(&content).is_ok());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_rejected_content_is_never_archived(extra in 1usize..20, empty in any::<bool>()) {
        let content = if empty {
            String::new()
        } else {
            "x".repeat(MAX_CONTENT_CHARS + extra)
        };

        let stored = block_on(async {
            let app = TestApp::new();
            let alice = app.user("alice").await;
            let bob = app.user("bob").await;
            let mut bob_session = app.connect(&bob).await;

            let result = send_message(&app.state, alice.id, SendMessagePayload::new(bob.id, content)).await;
            assert!(result.is_err());
            assert!(crate::common::new_messages(&crate::common::routed(&mut bob_session)).is_empty());
            app.archive.len().await
        });
        prop_assert_eq!(stored, 0);
    }
}
