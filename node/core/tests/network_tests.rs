use taskvault_core::network::NetworkConfig;
use taskvault_core::VaultError;

#[test]
fn recognized_networks_resolve() {
    let sepolia = NetworkConfig::resolve("sepolia", "key").unwrap();
    assert_eq!(sepolia.chain_id, 11155111);
    assert!(sepolia.rpc_url.ends_with("/key"));

    let celo = NetworkConfig::resolve("celo", "key").unwrap();
    assert_eq!(celo.chain_id, 44787);
}

// The advertised set and the resolver must never drift apart.
#[test]
fn every_recognized_network_resolves() {
    for name in NetworkConfig::RECOGNIZED {
        assert!(NetworkConfig::resolve(name, "key").is_ok(), "{name}");
    }
}

#[test]
fn unknown_network_is_fatal() {
    match NetworkConfig::resolve("mainnet", "key") {
        Err(VaultError::UnsupportedNetwork(name)) => assert_eq!(name, "mainnet"),
        other => panic!("expected UnsupportedNetwork, got {other:?}"),
    }
}
