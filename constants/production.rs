// Production environment constants
pub const CHAIN_ID: u64 = 8453;
pub const NETWORK_NAME: &str = "base";
pub const NATIVE_SYMBOL: &str = "ETH";
pub const FACTORY_ADDRESS: &str = "0x9406Cc6185a346906296840746125a0E44976454";
pub const ENTRY_POINT_ADDRESS: &str = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789";
pub const CONFIRMATIONS: u64 = 1;
pub const CONFIRMATION_TIMEOUT_SECS: u64 = 120;
pub const RECEIPT_POLL_MS: u64 = 2000;
pub const RPC_TIMEOUT_SECS: u64 = 30;
