pub const ETH_CONSENSUS_VERSION: &str = "eth-consensus-version";
