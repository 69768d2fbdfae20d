use rand::Rng;

/// Length of every generated short code.
pub const CODE_LENGTH: usize = 6;

/// URL-safe alphabet: 64 symbols, so each character carries 6 bits.
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Source of candidate short codes.
///
/// Implementations do not check for collisions; the store's uniqueness
/// constraint on `short` is the real guard and the [`Shortener`] retries.
///
/// [`Shortener`]: crate::shortener::Shortener
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Default generator: [`CODE_LENGTH`] characters drawn independently and
/// uniformly from [`ALPHABET`] using the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCode;

impl CodeGenerator for RandomCode {
    fn generate(&self) -> String {
        random_code(CODE_LENGTH)
    }
}

/// Generate a random URL-safe string of the given length.
pub fn random_code(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
