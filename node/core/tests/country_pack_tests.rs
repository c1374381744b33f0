use ethers::types::U256;
use taskvault_core::countries::{
    pack_countries, unpack_countries, Country, DEFAULT_SANCTIONED, MAX_EXCLUDED_COUNTRIES,
};
use taskvault_core::VaultError;

fn synthetic_list(len: usize) -> Vec<Country> {
    (0..len)
        .map(|i| {
            let code = format!(
                "{}{}{}",
                (b'A' + (i / 26) as u8) as char,
                (b'A' + (i % 26) as u8) as char,
                'X'
            );
            Country::new(&code).unwrap()
        })
        .collect()
}

#[test]
fn empty_list_packs_to_zero_words() {
    let words = pack_countries(&[]).unwrap();
    assert_eq!(words, [U256::zero(); 4]);
    assert_eq!(unpack_countries(&words).unwrap(), Vec::<Country>::new());
}

#[test]
fn single_country_occupies_most_significant_slot() {
    let words = pack_countries(&[Country::IRAN]).unwrap();
    // "IRN" = 0x49524E in the first 24-bit slot of word 0.
    assert_eq!((words[0] >> 216).low_u32(), 0x49524E);
    assert_eq!(words[1], U256::zero());
    assert_eq!(words[2], U256::zero());
    assert_eq!(words[3], U256::zero());
}

#[test]
fn sanctioned_set_round_trips() {
    let words = pack_countries(&DEFAULT_SANCTIONED).unwrap();
    assert_eq!(unpack_countries(&words).unwrap(), DEFAULT_SANCTIONED.to_vec());
}

#[test]
fn round_trip_preserves_order_at_every_length() {
    for len in 0..=MAX_EXCLUDED_COUNTRIES {
        let list = synthetic_list(len);
        let words = pack_countries(&list).unwrap();
        assert_eq!(unpack_countries(&words).unwrap(), list, "length {len}");
    }
}

#[test]
fn eleventh_country_spills_into_second_word() {
    let list = synthetic_list(11);
    let words = pack_countries(&list).unwrap();
    assert_ne!(words[1], U256::zero());
    assert_eq!(words[2], U256::zero());
    assert_eq!(unpack_countries(&words).unwrap(), list);
}

#[test]
fn forty_one_countries_rejected_before_packing() {
    let list = vec![Country::IRAN; 41];
    match pack_countries(&list) {
        Err(VaultError::InvalidCountrySelection { count }) => assert_eq!(count, 41),
        other => panic!("expected InvalidCountrySelection, got {other:?}"),
    }
}

#[test]
fn duplicate_entries_are_preserved_not_deduplicated() {
    let list = vec![Country::RUSSIA, Country::RUSSIA];
    let words = pack_countries(&list).unwrap();
    assert_eq!(unpack_countries(&words).unwrap(), list);
}

#[test]
fn unpack_rejects_non_alphabetic_slot() {
    let mut words = [U256::zero(); 4];
    words[0] = U256::from(0x010101u32) << 216;
    match unpack_countries(&words) {
        Err(VaultError::MalformedConfig(_)) => {}
        other => panic!("expected MalformedConfig, got {other:?}"),
    }
}

#[test]
fn country_code_validation() {
    assert!(Country::new("IRN").is_ok());
    assert!(Country::new("irn").is_err());
    assert!(Country::new("IR").is_err());
    assert!(Country::new("IRAN").is_err());
    assert!(Country::new("I1N").is_err());
    assert_eq!(Country::new("VEN").unwrap(), Country::VENEZUELA);
}

#[test]
fn country_serde_uses_alpha3_string() {
    let json = serde_json::to_string(&Country::NORTH_KOREA).unwrap();
    assert_eq!(json, "\"PRK\"");
    let back: Country = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Country::NORTH_KOREA);
    assert!(serde_json::from_str::<Country>("\"prk\"").is_err());
}
