use alloy_sol_types::sol;

sol! {
    #[sol(rpc)]
    interface IBridge {
        function resourceIDToHandlerAddress(bytes32 resourceID) external view returns (address);
        function adminSetResource(address handlerAddress, bytes32 resourceID, address tokenAddress) external;
        function deposit(uint8 destinationDomainID, bytes32 resourceID, bytes calldata data) external payable;
        function voteProposal(uint8 chainID, uint64 depositNonce, bytes32 resourceID, bytes calldata data) external;

        event Deposit(
            uint8 destinationDomainID,
            bytes32 resourceID,
            uint64 depositNonce,
            address user,
            bytes data,
            bytes handlerResponse
        );
    }
}

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }
}
