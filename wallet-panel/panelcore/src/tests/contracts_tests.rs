#[cfg(test)]
mod contracts_tests {
    use crate::contracts::{self, account, factory};
    use alloy_primitives::{address, keccak256, U256};
    use alloy_sol_types::{SolCall, SolValue};

    fn selector(signature: &str) -> [u8; 4] {
        keccak256(signature.as_bytes())[..4].try_into().unwrap()
    }

    #[test]
    fn test_selectors_match_signatures() {
        assert_eq!(factory::createAccountCall::SELECTOR, selector("createAccount(address,uint256)"));
        assert_eq!(factory::getAddressCall::SELECTOR, selector("getAddress(address,uint256)"));
        assert_eq!(account::executeCall::SELECTOR, selector("execute(address,uint256,bytes)"));
        assert_eq!(account::addDepositCall::SELECTOR, selector("addDeposit()"));
        assert_eq!(
            account::withdrawDepositToCall::SELECTOR,
            selector("withdrawDepositTo(address,uint256)")
        );
        assert_eq!(account::getDepositCall::SELECTOR, selector("getDeposit()"));
    }

    #[test]
    fn test_create_account_calldata_layout() {
        let owner = address!("00000000000000000000000000000000000000aa");
        let salt = U256::from(7u64);
        let data = contracts::create_account_calldata(owner, salt);
        assert_eq!(data.len(), 4 + 32 * 2);
        let decoded = factory::createAccountCall::abi_decode(&data, true).unwrap();
        assert_eq!(decoded.owner, owner);
        assert_eq!(decoded.salt, salt);
    }

    #[test]
    fn test_execute_transfer_uses_empty_payload() {
        let dest = address!("00000000000000000000000000000000000000bb");
        let data = contracts::execute_transfer_calldata(dest, U256::from(5u64));
        let decoded = account::executeCall::abi_decode(&data, true).unwrap();
        assert_eq!(decoded.dest, dest);
        assert_eq!(decoded.value, U256::from(5u64));
        assert!(decoded.func.is_empty());
    }

    #[test]
    fn test_add_deposit_is_bare_selector() {
        let data = contracts::add_deposit_calldata();
        assert_eq!(&data[..], &selector("addDeposit()")[..]);
    }

    #[test]
    fn test_decode_view_returns() {
        let account_addr = address!("00000000000000000000000000000000000000cc");
        let encoded = account_addr.abi_encode();
        assert_eq!(contracts::decode_get_address(&encoded).unwrap(), account_addr);

        let deposit = U256::from(123_456u64);
        assert_eq!(contracts::decode_get_deposit(&deposit.abi_encode()).unwrap(), deposit);
    }

    #[test]
    fn test_decode_rejects_short_return_data() {
        assert!(contracts::decode_get_address(&[0u8; 4]).is_err());
        assert!(contracts::decode_get_deposit(&[]).is_err());
    }
}
