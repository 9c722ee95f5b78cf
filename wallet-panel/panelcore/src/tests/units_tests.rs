#[cfg(test)]
mod units_tests {
    use crate::error::PanelError;
    use crate::units::*;
    use alloy_primitives::U256;

    fn wei(s: &str) -> U256 {
        U256::from_str_radix(s, 10).unwrap()
    }

    #[test]
    fn test_parse_amount_whole_and_fractional() {
        assert_eq!(parse_amount("1").unwrap(), wei("1000000000000000000"));
        assert_eq!(parse_amount("0.5").unwrap(), wei("500000000000000000"));
        assert_eq!(parse_amount("0.2").unwrap(), wei("200000000000000000"));
        assert_eq!(parse_amount(".25").unwrap(), wei("250000000000000000"));
        assert_eq!(parse_amount("3.").unwrap(), wei("3000000000000000000"));
        assert_eq!(parse_amount("0.000000000000000001").unwrap(), U256::from(1u64));
    }

    #[test]
    fn test_parse_amount_ignores_trailing_zero_precision() {
        assert_eq!(
            parse_amount("1.50000000000000000000000").unwrap(),
            wei("1500000000000000000")
        );
    }

    #[test]
    fn test_parse_amount_rejects_malformed_input() {
        for input in ["", "abc", "-1", "1.2.3", ".", "1e18", " 1", "0x10", "1,5"] {
            let err = parse_amount(input).unwrap_err();
            assert!(
                matches!(err, PanelError::AmountParseError { .. }),
                "{input:?} gave {err:?}"
            );
            assert_eq!(err.kind(), "AmountParseError");
        }
    }

    #[test]
    fn test_parse_amount_rejects_excess_precision() {
        let err = parse_amount("0.0000000000000000001").unwrap_err();
        assert!(err.to_string().contains("exceeds 18 decimals"));
    }

    #[test]
    fn test_parse_amount_rejects_overflow() {
        let huge = "9".repeat(80);
        assert!(parse_amount(&huge).is_err());
    }

    #[test]
    fn test_format_amount_matches_wallet_display() {
        assert_eq!(format_amount(U256::ZERO), "0.0");
        assert_eq!(format_amount(wei("500000000000000000")), "0.5");
        assert_eq!(format_amount(wei("300000000000000000")), "0.3");
        assert_eq!(format_amount(wei("1000000000000000000")), "1.0");
        assert_eq!(format_amount(wei("1000000000000000001")), "1.000000000000000001");
        assert_eq!(format_amount(U256::from(1u64)), "0.000000000000000001");
        assert_eq!(format_amount(wei("12345000000000000000000")), "12345.0");
    }

    #[test]
    fn test_format_units_other_decimals() {
        assert_eq!(format_units(U256::from(1_500_000u64), 6), "1.5");
        assert_eq!(parse_units("1.5", 6).unwrap(), U256::from(1_500_000u64));
    }
}
