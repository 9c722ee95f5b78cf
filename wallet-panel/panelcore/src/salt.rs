use alloy_primitives::{keccak256, Address, B256, U256};

pub const SALT_SUFFIX: &str = "SimpleAccountSalt";

/// Derive the per-owner account salt.
///
/// The owner is rendered in EIP-55 checksum form, which is what a wallet
/// reports for its selected account, so the salt matches one derived from
/// the wallet's own address string.
pub fn derive_salt(owner: Address) -> B256 {
    let base = format!("{}{}", owner.to_checksum(None), SALT_SUFFIX);
    keccak256(base.as_bytes())
}

/// Factories take the salt as a `uint256`.
pub fn salt_as_uint(salt: B256) -> U256 {
    U256::from_be_bytes(salt.0)
}
