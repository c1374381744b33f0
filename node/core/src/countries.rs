use crate::error::VaultError;
use ethers::types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hard cap on excluded countries, fixed by the on-chain field width.
pub const MAX_EXCLUDED_COUNTRIES: usize = 40;

const CODE_BITS: usize = 24;
const CODES_PER_WORD: usize = 10;
const CODE_MASK: u32 = 0xFF_FFFF;

/// ISO-3166 alpha-3 country code, three uppercase ASCII letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Country([u8; 3]);

impl Country {
    pub const IRAN: Country = Country(*b"IRN");
    pub const IRAQ: Country = Country(*b"IRQ");
    pub const NORTH_KOREA: Country = Country(*b"PRK");
    pub const RUSSIA: Country = Country(*b"RUS");
    pub const SYRIAN_ARAB_REPUBLIC: Country = Country(*b"SYR");
    pub const VENEZUELA: Country = Country(*b"VEN");
    pub const CUBA: Country = Country(*b"CUB");
    pub const BELARUS: Country = Country(*b"BLR");
    pub const MYANMAR: Country = Country(*b"MMR");
    pub const UNITED_STATES: Country = Country(*b"USA");
    pub const CHINA: Country = Country(*b"CHN");
    pub const FRANCE: Country = Country(*b"FRA");
    pub const GERMANY: Country = Country(*b"DEU");
    pub const INDIA: Country = Country(*b"IND");
    pub const JAPAN: Country = Country(*b"JPN");
    pub const UNITED_KINGDOM: Country = Country(*b"GBR");

    pub fn new(code: &str) -> Result<Self, VaultError> {
        let bytes = code.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_uppercase()) {
            return Err(VaultError::MalformedConfig(format!(
                "{code:?} is not a three-letter uppercase country code"
            )));
        }
        Ok(Country([bytes[0], bytes[1], bytes[2]]))
    }

    pub fn as_str(&self) -> &str {
        // Constructors only admit ASCII uppercase.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }

    fn code_bits(&self) -> u32 {
        ((self.0[0] as u32) << 16) | ((self.0[1] as u32) << 8) | self.0[2] as u32
    }

    fn from_code_bits(code: u32) -> Result<Self, VaultError> {
        let bytes = [(code >> 16) as u8, (code >> 8) as u8, code as u8];
        if !bytes.iter().all(|b| b.is_ascii_uppercase()) {
            return Err(VaultError::MalformedConfig(format!(
                "packed country slot 0x{code:06x} is not an alpha-3 code"
            )));
        }
        Ok(Country(bytes))
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Country {
    type Error = VaultError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Country::new(&value)
    }
}

impl From<Country> for String {
    fn from(country: Country) -> Self {
        country.as_str().to_string()
    }
}

/// Exclusion list applied by default at deployment time.
pub const DEFAULT_SANCTIONED: [Country; 6] = [
    Country::IRAN,
    Country::IRAQ,
    Country::NORTH_KOREA,
    Country::RUSSIA,
    Country::SYRIAN_ARAB_REPUBLIC,
    Country::VENEZUELA,
];

/// Pack up to 40 country codes into the four 256-bit words the chain
/// stores. Word `w` holds countries `10w..10w+10`; within a word the
/// first country occupies the most significant 24-bit slot. Zero slots
/// are padding (a valid code can never be zero).
pub fn pack_countries(countries: &[Country]) -> Result<[U256; 4], VaultError> {
    if countries.len() > MAX_EXCLUDED_COUNTRIES {
        return Err(VaultError::InvalidCountrySelection {
            count: countries.len(),
        });
    }

    let mut words = [U256::zero(); 4];
    for (i, country) in countries.iter().enumerate() {
        let word = i / CODES_PER_WORD;
        let slot = i % CODES_PER_WORD;
        let shift = CODE_BITS * (CODES_PER_WORD - 1 - slot);
        words[word] = words[word] | (U256::from(country.code_bits()) << shift);
    }

    Ok(words)
}

/// Inverse of [`pack_countries`]: walks the slots in packing order and
/// stops at the first zero slot, dropping trailing padding.
pub fn unpack_countries(words: &[U256; 4]) -> Result<Vec<Country>, VaultError> {
    let mut countries = Vec::new();
    for word in words {
        for slot in 0..CODES_PER_WORD {
            let shift = CODE_BITS * (CODES_PER_WORD - 1 - slot);
            let code = ((*word >> shift) & U256::from(CODE_MASK)).low_u32();
            if code == 0 {
                return Ok(countries);
            }
            countries.push(Country::from_code_bits(code)?);
        }
    }
    Ok(countries)
}
