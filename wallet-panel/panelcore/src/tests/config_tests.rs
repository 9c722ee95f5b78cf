#[cfg(test)]
mod config_tests {
    use crate::config::*;
    use crate::constants;
    use crate::error::ConfigError;
    use alloy_primitives::{address, Address};
    use std::str::FromStr;

    #[test]
    fn test_default_config_uses_constants() {
        let config = PanelConfig::default();
        assert_eq!(config.chain_id, constants::CHAIN_ID);
        assert_eq!(
            config.factory_address,
            Address::from_str(constants::FACTORY_ADDRESS).unwrap()
        );
        assert_eq!(
            config.entry_point_address,
            Address::from_str(constants::ENTRY_POINT_ADDRESS).unwrap()
        );
        assert_eq!(config.balance_source, BalanceSource::DepositLedgerBalance);
        assert_eq!(config.transfer_strategy, TransferStrategy::WithdrawDeposit);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_override_keeps_defaults() {
        let json = r#"{
            "factory_address": "0x00000000000000000000000000000000000000f1",
            "balance_source": "NativeBalance",
            "transfer_strategy": "DirectExecute"
        }"#;
        let config = PanelConfig::from_json(json).unwrap();
        assert_eq!(config.factory_address, address!("00000000000000000000000000000000000000f1"));
        assert_eq!(config.balance_source, BalanceSource::NativeBalance);
        assert_eq!(config.transfer_strategy, TransferStrategy::DirectExecute);
        assert_eq!(config.chain_id, constants::CHAIN_ID);
        assert_eq!(config.confirmations, constants::CONFIRMATIONS);
    }

    #[test]
    fn test_zero_factory_is_rejected() {
        let json = r#"{ "factory_address": "0x0000000000000000000000000000000000000000" }"#;
        let err = PanelConfig::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddress { field: "factory", .. }));
    }

    #[test]
    fn test_zero_timeouts_are_rejected() {
        let err = PanelConfig::from_json(r#"{ "confirmation_timeout_secs": 0 }"#).unwrap_err();
        assert_eq!(err, ConfigError::Zero("confirmation_timeout_secs"));
        let err = PanelConfig::from_json(r#"{ "confirmations": 0 }"#).unwrap_err();
        assert_eq!(err, ConfigError::Zero("confirmations"));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            PanelConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            PanelConfig::from_json(r#"{ "factory_address": "nope" }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_parse_address_trims_and_validates() {
        assert_eq!(
            parse_address(" 0x00000000000000000000000000000000000000f1 "),
            Some(address!("00000000000000000000000000000000000000f1"))
        );
        assert_eq!(parse_address("0xDEF"), None);
        assert_eq!(parse_address(""), None);
    }
}
