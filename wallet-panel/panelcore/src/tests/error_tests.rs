#[cfg(test)]
mod error_tests {
    use crate::error::*;

    #[test]
    fn test_status_codes_follow_error_kind() {
        let cases = [
            (PanelError::amount("abc", "unexpected character 'a'"), 400),
            (PanelError::InvalidAddress("0xDEF".to_string()), 400),
            (PanelError::UserRejected("denied".to_string()), 403),
            (PanelError::OperationInProgress("send".to_string()), 409),
            (PanelError::ProviderUnavailable, 503),
            (PanelError::ConfirmationTimeout("0x01".to_string()), 504),
            (PanelError::FactoryCallFailed("reverted".to_string()), 502),
            (PanelError::BalanceQueryFailed("rpc".to_string()), 502),
            (PanelError::TransferFailed("reverted".to_string()), 502),
            (PanelError::Config(ConfigError::Zero("chain_id")), 500),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{}", err.kind());
        }
    }

    #[test]
    fn test_provider_failures_map_per_operation() {
        assert_eq!(
            PanelError::from_factory(ProviderError::Unavailable),
            PanelError::ProviderUnavailable
        );
        assert!(matches!(
            PanelError::from_factory(ProviderError::Rejected("no".to_string())),
            PanelError::FactoryCallFailed(_)
        ));
        assert!(matches!(
            PanelError::from_transfer(ProviderError::Reverted("out of funds".to_string())),
            PanelError::TransferFailed(_)
        ));
        assert!(matches!(
            PanelError::from_transfer(ProviderError::Timeout("0x01".to_string())),
            PanelError::ConfirmationTimeout(_)
        ));
    }

    #[test]
    fn test_error_info_carries_kind_and_message() {
        let info = ErrorInfo::from(&PanelError::TransferFailed("send reverted".to_string()));
        assert_eq!(info.kind, "TransferFailed");
        assert_eq!(info.message, "transfer failed: send reverted");
    }
}
