//! # Transactions Contract ABI
//!
//! ```solidity
//! struct TransferStruct {
//!     address sender;
//!     address receiver;
//!     uint amount;
//!     string message;
//!     uint256 timestamp;
//!     string keyword;
//! }
//! ```

use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct TransferStruct {
        address sender;
        address receiver;
        uint256 amount;
        string message;
        uint256 timestamp;
        string keyword;
    }

    function addToBlockchain(address receiver, uint256 amount, string memory message, string memory keyword) external;

    function getAllTransactions() external view returns (TransferStruct[] memory);

    function getTransactionCount() external view returns (uint256);
}

/// A ledger entry exactly as the contract returns it.
pub type RawTransfer = TransferStruct;
