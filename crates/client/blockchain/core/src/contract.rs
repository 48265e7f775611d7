//! ABI of the .kot naming registry contract.
//!
//! Only the entry points the client consumes are declared. Single-value
//! returns are decoded with `SolValue` on the caller side.

use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IKotRegistry {
        /// Registers `name` to the caller; payable, priced by name length.
        function register(string name) external payable;

        /// Attaches a textual record to a name owned by the caller.
        function setRecord(string name, string record) external;

        /// Every registered name in registration order.
        function getAllNames() external view returns (string[] memory);

        /// Record attached to `name` (empty when unset).
        function records(string name) external view returns (string memory);

        /// Owner of `name` (zero address when unregistered).
        function domains(string name) external view returns (address);
    }
}
