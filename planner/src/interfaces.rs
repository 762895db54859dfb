//! Solidity ABI scaffolding for every external contract this planner encodes
//! calls against.
//!
//! These declarations are the wire format: selectors and argument layouts must
//! match the deployed contracts bit-for-bit, since nothing here is checked
//! until the proposal executes. Function and parameter names mirror the
//! on-chain sources so the selectors hash correctly.

use alloy_sol_types::sol;

sol! {
    /// Safe v1.3.0 proxy setup, called once through the proxy constructor
    /// path. The planner always passes threshold 1 and appends the transient
    /// owner; see `initializers`.
    function setup(
        address[] _owners,
        uint256 _threshold,
        address to,
        bytes data,
        address fallbackHandler,
        address paymentToken,
        uint256 payment,
        address paymentReceiver
    ) external;

    /// Safe execTransaction. Used with the pre-approved-owner signature
    /// encoding so the batch executor can drive a Safe it temporarily owns.
    function execTransaction(
        address to,
        uint256 value,
        bytes data,
        uint8 operation,
        uint256 safeTxGas,
        uint256 baseGas,
        uint256 gasPrice,
        address gasToken,
        address refundReceiver,
        bytes signatures
    ) external payable returns (bool success);

    function enableModule(address module) external;
    function removeOwner(address prevOwner, address owner, uint256 _threshold) external;
    function getModulesPaginated(address start, uint256 pageSize) external view returns (address[] array, address next);

    /// Safe proxy factory.
    function createProxyWithNonce(address _singleton, bytes initializer, uint256 saltNonce) external returns (address proxy);
    function proxyCreationCode() external pure returns (bytes);

    /// Zodiac module proxy factory (ERC-1167 minimal proxies).
    function deployModule(address masterCopy, bytes initializer, uint256 saltNonce) external returns (address proxy);

    /// Zodiac module initialization entry point (both module kinds).
    function setUp(bytes initParams) external;

    /// MultiSend / MultiSendCallOnly.
    function multiSend(bytes transactions) external payable;

    /// Sub-DAO registry.
    function declareSubDAO(address _subDAOAddress) external;
    function updateDAOName(string _name) external;

    /// ENS public resolver text record.
    function setText(bytes32 node, string key, string value) external;

    /// ENS name wrapper ownership lookup.
    function ownerOf(uint256 id) external view returns (address owner);

    /// ERC-20 surface used for funding transfers and config validation.
    function transfer(address to, uint256 amount) external returns (bool);
    function decimals() external view returns (uint8);
    function balanceOf(address account) external view returns (uint256);

    /// Governance module proposal submission.
    struct ProposalTransaction {
        address to;
        uint256 value;
        bytes data;
        uint8 operation;
    }

    function submitProposal(
        address _strategy,
        bytes _data,
        ProposalTransaction[] _transactions,
        string _metadata
    ) external;

    /// Governance module probe surface (used by discovery only).
    function getStrategies(address _startAddress, uint256 _count) external view returns (address[] _strategies, address _next);
    function executionPeriod() external view returns (uint32);
    function timelockPeriod() external view returns (uint32);
    function totalProposalCount() external view returns (uint32);

    /// Linear voting strategy probe surface (used by discovery only).
    function BASIS_DENOMINATOR() external view returns (uint256);
    function QUORUM_DENOMINATOR() external view returns (uint256);
    function azoriusModule() external view returns (address);
    function basisNumerator() external view returns (uint256);
    function governanceToken() external view returns (address);
    function quorumNumerator() external view returns (uint256);
    function requiredProposerWeight() external view returns (uint256);
    function votingPeriod() external view returns (uint32);

    /// Multicall3 batched reads.
    struct Call3 {
        address target;
        bool allowFailure;
        bytes callData;
    }

    struct Call3Result {
        bool success;
        bytes returnData;
    }

    function aggregate3(Call3[] calls) external payable returns (Call3Result[] returnData);
}
