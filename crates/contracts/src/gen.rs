use ethers::contract::abigen;

abigen!(
    EntryPointAPI,
    r#"[
        function getNonce(address sender, uint192 key) public view returns (uint256 nonce)
    ]"#
);

abigen!(
    BiconomyAccountFactory,
    r#"[
        function getAddressForCounterFactualAccount(address moduleSetupContract, bytes calldata moduleSetupData, uint256 index) external view returns (address _account)
        function deployCounterFactualAccount(address moduleSetupContract, bytes calldata moduleSetupData, uint256 index) public returns (address proxy)
    ]"#
);

abigen!(
    EcdsaOwnershipModule,
    r#"[
        function initForSmartAccount(address eoaOwner) external returns (address)
    ]"#
);

abigen!(
    BiconomySmartAccountAPI,
    r#"[
        function execute(address dest, uint256 value, bytes calldata func) external
    ]"#
);
