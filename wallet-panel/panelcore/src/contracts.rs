//! ABI bindings for the account factory and the smart account.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;

pub mod factory {
    alloy_sol_types::sol! {
        function createAccount(address owner, uint256 salt) external returns (address);
        function getAddress(address owner, uint256 salt) external view returns (address);
    }
}

pub mod account {
    alloy_sol_types::sol! {
        function execute(address dest, uint256 value, bytes func) external;
        function addDeposit() external payable;
        function withdrawDepositTo(address withdrawAddress, uint256 amount) external;
        function getDeposit() external view returns (uint256);
    }
}

pub fn create_account_calldata(owner: Address, salt: U256) -> Bytes {
    factory::createAccountCall { owner, salt }.abi_encode().into()
}

pub fn get_address_calldata(owner: Address, salt: U256) -> Bytes {
    factory::getAddressCall { owner, salt }.abi_encode().into()
}

pub fn decode_get_address(data: &[u8]) -> Result<Address, String> {
    factory::getAddressCall::abi_decode_returns(data, true)
        .map(|ret| ret._0)
        .map_err(|e| format!("failed to decode getAddress result: {e}"))
}

/// `execute(dest, value, 0x)`: plain value transfer routed through the account.
pub fn execute_transfer_calldata(dest: Address, value: U256) -> Bytes {
    account::executeCall {
        dest,
        value,
        func: Bytes::new(),
    }
    .abi_encode()
    .into()
}

pub fn add_deposit_calldata() -> Bytes {
    account::addDepositCall {}.abi_encode().into()
}

pub fn withdraw_deposit_to_calldata(recipient: Address, amount: U256) -> Bytes {
    account::withdrawDepositToCall {
        withdrawAddress: recipient,
        amount,
    }
    .abi_encode()
    .into()
}

pub fn get_deposit_calldata() -> Bytes {
    account::getDepositCall {}.abi_encode().into()
}

pub fn decode_get_deposit(data: &[u8]) -> Result<U256, String> {
    account::getDepositCall::abi_decode_returns(data, true)
        .map(|ret| ret._0)
        .map_err(|e| format!("failed to decode getDeposit result: {e}"))
}
