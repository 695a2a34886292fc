use rand::Rng;
use rand::distr::Alphanumeric;

/// Number of random characters appended to every template.
pub const SUFFIX_LEN: usize = 6;

/// Generate a fresh suffix of [`SUFFIX_LEN`] characters from `[A-Za-z0-9]`.
pub fn generate_suffix<R: Rng>(rng: &mut R) -> [u8; SUFFIX_LEN] {
	let mut suffix = [0u8; SUFFIX_LEN];
	for byte in suffix.iter_mut() {
		*byte = rng.sample(Alphanumeric);
	}
	suffix
}

pub fn is_suffix_byte(byte: u8) -> bool {
	byte.is_ascii_alphanumeric()
}
