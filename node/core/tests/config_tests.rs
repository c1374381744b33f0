use ethers::types::U256;
use taskvault_core::countries::{pack_countries, DEFAULT_SANCTIONED};
use taskvault_core::{SerializedVerificationConfig, VaultError, VerificationConfig};

fn sample_config() -> VerificationConfig {
    VerificationConfig {
        scope: U256::from_dec_str("98765432109876543210").unwrap(),
        attestation_id: U256::from(1u64),
        older_than_enabled: true,
        older_than: U256::from(18u64),
        forbidden_countries_enabled: true,
        forbidden_countries_list_packed: pack_countries(&DEFAULT_SANCTIONED).unwrap(),
        ofac_enabled: [true, false, false],
    }
}

#[test]
fn serialize_then_deserialize_is_identity() {
    let config = sample_config();
    assert_eq!(config.serialize().deserialize().unwrap(), config);
}

#[test]
fn all_zero_config_round_trips() {
    let config = VerificationConfig {
        scope: U256::zero(),
        attestation_id: U256::zero(),
        older_than_enabled: false,
        older_than: U256::zero(),
        forbidden_countries_enabled: false,
        forbidden_countries_list_packed: [U256::zero(); 4],
        ofac_enabled: [false, false, false],
    };
    assert_eq!(config.serialize().deserialize().unwrap(), config);
}

#[test]
fn maximum_word_round_trips() {
    let mut config = sample_config();
    config.scope = U256::MAX;
    let serialized = config.serialize();
    assert_eq!(
        serialized.scope,
        "115792089237316195423570985008687907853269984665640564039457584007913129639935"
    );
    assert_eq!(serialized.deserialize().unwrap(), config);
}

#[test]
fn serialized_integers_are_decimal_strings() {
    let serialized = sample_config().serialize();
    assert_eq!(serialized.scope, "98765432109876543210");
    assert_eq!(serialized.attestation_id, "1");
    assert_eq!(serialized.older_than, "18");
    assert_eq!(serialized.forbidden_countries_list_packed.len(), 4);
    assert_eq!(serialized.ofac_enabled, vec![true, false, false]);
}

#[test]
fn string_round_trip_is_stable() {
    // string -> integer -> string must reproduce the stored text.
    let serialized = sample_config().serialize();
    let again = serialized.deserialize().unwrap().serialize();
    assert_eq!(serialized, again);
}

#[test]
fn json_field_names_match_stored_documents() {
    let json = serde_json::to_value(sample_config().serialize()).unwrap();
    assert!(json.get("forbiddenCountriesListPacked").is_some());
    assert!(json.get("olderThanEnabled").is_some());
    assert!(json.get("ofacEnabled").is_some());
}

fn expect_malformed(serialized: SerializedVerificationConfig) {
    match serialized.deserialize() {
        Err(VaultError::MalformedConfig(_)) => {}
        other => panic!("expected MalformedConfig, got {other:?}"),
    }
}

#[test]
fn packed_list_arity_is_enforced() {
    let mut three = sample_config().serialize();
    three.forbidden_countries_list_packed.pop();
    expect_malformed(three);

    let mut five = sample_config().serialize();
    five.forbidden_countries_list_packed.push("0".to_string());
    expect_malformed(five);
}

#[test]
fn ofac_arity_is_enforced() {
    let mut two = sample_config().serialize();
    two.ofac_enabled.pop();
    expect_malformed(two);

    let mut four = sample_config().serialize();
    four.ofac_enabled.push(false);
    expect_malformed(four);
}

#[test]
fn non_numeric_fields_are_rejected() {
    for bad in ["abc", "-1", "0x10", "", "1.5", " 42"] {
        let mut serialized = sample_config().serialize();
        serialized.scope = bad.to_string();
        expect_malformed(serialized);
    }
}

#[test]
fn oversized_integer_is_rejected() {
    let mut serialized = sample_config().serialize();
    // One digit past 2^256 - 1.
    serialized.older_than =
        "1157920892373161954235709850086879078532699846656405640394575840079131296399350"
            .to_string();
    expect_malformed(serialized);
}

#[test]
fn bad_packed_word_is_rejected() {
    let mut serialized = sample_config().serialize();
    serialized.forbidden_countries_list_packed[2] = "not-a-number".to_string();
    expect_malformed(serialized);
}

#[test]
fn default_config_enables_expected_gates() {
    let config =
        VerificationConfig::default_for_endpoint("https://vault.example.org", "taskvault-ai")
            .unwrap();
    assert_eq!(config.attestation_id, U256::from(1u64));
    assert!(config.older_than_enabled);
    assert_eq!(config.older_than, U256::from(18u64));
    assert!(config.forbidden_countries_enabled);
    assert_eq!(config.ofac_enabled, [true, false, false]);
    assert_ne!(config.scope, U256::zero());
}
