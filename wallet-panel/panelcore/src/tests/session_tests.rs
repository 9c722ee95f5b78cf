#[cfg(test)]
mod session_tests {
    use crate::error::PanelError;
    use crate::session::*;
    use alloy_primitives::{address, B256, U256};

    fn record() -> AccountRecord {
        AccountRecord {
            owner: address!("00000000000000000000000000000000000000a1"),
            salt: B256::repeat_byte(1),
            smart_account: address!("00000000000000000000000000000000000000c1"),
        }
    }

    #[test]
    fn test_new_session_is_disconnected() {
        let session = Session::new();
        assert_eq!(session.phase, Phase::Disconnected);
        assert!(session.owner().is_none());
        assert!(session.account().is_none());
        assert!(session.balance.is_none());
        assert!(session.in_flight().is_none());
        assert_eq!(session.view().phase, "Disconnected");
    }

    #[test]
    fn test_in_flight_lock_is_exclusive() {
        let mut session = Session::new();
        let id = session.begin(Operation::Send).unwrap();
        let err = session.begin(Operation::Deposit).unwrap_err();
        assert!(matches!(err, PanelError::OperationInProgress(_)));
        assert_eq!(session.in_flight().unwrap().operation, Operation::Send);

        session.finish("some-other-id");
        assert!(session.in_flight().is_some());

        session.finish(&id);
        assert!(session.in_flight().is_none());
        assert!(session.begin(Operation::Deposit).is_ok());
    }

    #[test]
    fn test_reconnect_same_owner_keeps_account() {
        let mut session = Session::new();
        let account = record();
        session.connect(account.owner);
        let (_, previous) = session.start_resolving().unwrap();
        assert!(session.resolve(&previous, account.clone()));
        session.set_balance(U256::from(5u64));

        session.connect(account.owner);
        assert_eq!(session.account(), Some(&account));
        assert!(session.balance.is_some());
    }

    #[test]
    fn test_connect_different_owner_resets_account_but_not_intent() {
        let mut session = Session::new();
        let account = record();
        session.connect(account.owner);
        let (_, previous) = session.start_resolving().unwrap();
        session.resolve(&previous, account);
        session.intent.amount = "0.2".to_string();

        let other = address!("00000000000000000000000000000000000000a2");
        session.connect(other);
        assert_eq!(session.phase, Phase::Connected { owner: other });
        assert!(session.balance.is_none());
        assert_eq!(session.intent.amount, "0.2");
    }

    #[test]
    fn test_resolving_rolls_back_on_failure() {
        let mut session = Session::new();
        assert!(session.start_resolving().is_none());

        let owner = record().owner;
        session.connect(owner);
        let (got_owner, previous) = session.start_resolving().unwrap();
        assert_eq!(got_owner, owner);
        assert_eq!(session.phase, Phase::Resolving { owner });

        session.rollback(previous);
        assert_eq!(session.phase, Phase::Connected { owner });
    }

    #[test]
    fn test_resolve_reports_address_change() {
        let mut session = Session::new();
        let account = record();
        session.connect(account.owner);
        let (_, previous) = session.start_resolving().unwrap();
        assert!(session.resolve(&previous, account.clone()));

        let (_, previous) = session.start_resolving().unwrap();
        assert!(!session.resolve(&previous, account));
    }

    #[test]
    fn test_activity_is_bounded_and_newest_first() {
        let mut session = Session::new();
        for i in 0..(MAX_ACTIVITY_ENTRIES + 5) {
            session.record(Operation::Refresh, ActivityStatus::Succeeded, format!("read {i}"), None);
        }
        let view = session.view();
        assert_eq!(view.activity.len(), MAX_ACTIVITY_ENTRIES);
        assert_eq!(view.activity[0].detail, format!("read {}", MAX_ACTIVITY_ENTRIES + 4));
        assert_eq!(view.activity.last().unwrap().detail, "read 5");
    }

    #[test]
    fn test_view_renders_balance_and_error() {
        let mut session = Session::new();
        let account = record();
        session.connect(account.owner);
        let (_, previous) = session.start_resolving().unwrap();
        session.resolve(&previous, account.clone());
        session.set_balance(U256::from(300_000_000_000_000_000u64));
        session.fail(&PanelError::TransferFailed("reverted".to_string()));

        let view = session.view();
        assert_eq!(view.phase, "Resolved");
        assert_eq!(view.smart_account, Some(account.smart_account));
        assert_eq!(view.balance.as_deref(), Some("0.3"));
        assert_eq!(view.balance_wei.as_deref(), Some("300000000000000000"));
        assert_eq!(view.salt.as_deref(), Some(format!("0x{}", "01".repeat(32)).as_str()));
        assert_eq!(view.last_error.as_ref().unwrap().kind, "TransferFailed");

        session.clear_error();
        assert!(session.view().last_error.is_none());
    }

    #[test]
    fn test_view_serializes() {
        let session = Session::new();
        let json = serde_json::to_value(session.view()).unwrap();
        assert_eq!(json["phase"], "Disconnected");
        assert!(json["owner"].is_null());
    }

    #[test]
    fn test_intent_update_is_partial() {
        let mut intent = TransferIntent::default();
        intent.apply(IntentUpdate {
            amount: Some("0.5".to_string()),
            recipient: Some("0xdef0000000000000000000000000000000000def".to_string()),
        });
        intent.apply(IntentUpdate {
            amount: Some("0.2".to_string()),
            recipient: None,
        });
        assert_eq!(intent.amount, "0.2");
        assert_eq!(intent.recipient, "0xdef0000000000000000000000000000000000def");

        intent.apply(IntentUpdate::default());
        assert_eq!(intent.amount, "0.2");
    }

    #[test]
    fn test_intent_update_from_json_body() {
        let update: IntentUpdate = serde_json::from_str(r#"{"amount":"1.5"}"#).unwrap();
        assert_eq!(update.recipient, None);

        let deposit = IntentUpdate {
            amount: Some("1".to_string()),
            recipient: Some("0xabc".to_string()),
        }
        .amount_only();
        assert_eq!(deposit.amount.as_deref(), Some("1"));
        assert_eq!(deposit.recipient, None);
    }
}
