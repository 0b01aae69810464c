use rand::{thread_rng, Rng};

pub const FOLIO_PREFIX: &str = "REC-";
const FOLIO_LEN: usize = 8;
const FOLIO_ALPHABET: &[u8] = b"0123456789ABCDEF";

/// Public tracking code handed to candidates, e.g. `REC-3F9A01BC`.
pub fn generate_folio() -> String {
    let mut rng = thread_rng();
    let code: String = (0..FOLIO_LEN)
        .map(|_| FOLIO_ALPHABET[rng.gen_range(0..FOLIO_ALPHABET.len())] as char)
        .collect();
    format!("{}{}", FOLIO_PREFIX, code)
}

pub fn normalize_folio(raw: &str) -> String {
    raw.trim().to_uppercase()
}
