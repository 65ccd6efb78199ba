//! Id generators.

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use uuid::Uuid;

/// Produces a fresh correlation id on every call.
pub type IdGenerator = Arc<dyn Fn() -> String + Send + Sync>;

/// 64 URL-safe symbols.
pub const DEFAULT_ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

pub const DEFAULT_ID_LENGTH: usize = 16;

/// Random ids over a fixed ASCII alphabet.
///
/// Draws from the calling thread's generator, so concurrent resources never
/// contend for a shared lock.
pub struct RandomIdGen {
    alphabet: Vec<u8>,
    length: usize,
}

impl RandomIdGen {
    /// `length` symbols from [`DEFAULT_ALPHABET`].
    pub fn new(length: usize) -> Self {
        Self::with_alphabet(length, DEFAULT_ALPHABET)
    }

    /// `length` symbols from `alphabet`, which must be non-empty ASCII.
    /// Non-ASCII bytes are dropped; an empty result falls back to the default
    /// alphabet, and a zero length falls back to [`DEFAULT_ID_LENGTH`].
    pub fn with_alphabet(length: usize, alphabet: &[u8]) -> Self {
        let mut alphabet: Vec<u8> = alphabet.iter().copied().filter(u8::is_ascii).collect();
        if alphabet.is_empty() {
            alphabet = DEFAULT_ALPHABET.to_vec();
        }
        let length = if length == 0 { DEFAULT_ID_LENGTH } else { length };
        Self { alphabet, length }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.length)
            .map(|_| self.alphabet[rng.gen_range(0..self.alphabet.len())] as char)
            .collect()
    }

    pub fn into_generator(self) -> IdGenerator {
        let gen = Arc::new(self);
        Arc::new(move || gen.generate())
    }
}

impl Default for RandomIdGen {
    fn default() -> Self {
        Self::new(DEFAULT_ID_LENGTH)
    }
}

impl fmt::Debug for RandomIdGen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomIdGen")
            .field("alphabet_len", &self.alphabet.len())
            .field("length", &self.length)
            .finish()
    }
}

/// 16 random symbols from the default alphabet.
pub fn default_id_gen() -> IdGenerator {
    RandomIdGen::default().into_generator()
}

/// Hyphenated UUID v4 strings.
pub fn uuid_id_gen() -> IdGenerator {
    Arc::new(|| Uuid::new_v4().to_string())
}

/// Wrap a fallible generator; failures yield `fallback` and a warning.
pub fn id_gen_with_fallback<F, E>(gen: F, fallback: impl Into<String>) -> IdGenerator
where
    F: Fn() -> Result<String, E> + Send + Sync + 'static,
    E: fmt::Display,
{
    let fallback = fallback.into();
    Arc::new(move || match gen() {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, fallback = %fallback, "Id generation failed, using fallback");
            fallback.clone()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_ids_are_unique() {
        let gen = default_id_gen();
        let ids: HashSet<String> = (0..10_000).map(|_| gen()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn ids_use_the_alphabet() {
        let id = RandomIdGen::default().generate();
        assert_eq!(id.len(), DEFAULT_ID_LENGTH);
        assert!(id.bytes().all(|b| DEFAULT_ALPHABET.contains(&b)));

        let hex = RandomIdGen::with_alphabet(8, b"0123456789abcdef").generate();
        assert_eq!(hex.len(), 8);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn empty_alphabet_falls_back() {
        let id = RandomIdGen::with_alphabet(4, b"").generate();
        assert_eq!(id.len(), 4);
    }

    #[test]
    fn zero_length_falls_back_to_default() {
        let gen = RandomIdGen::new(0);
        assert_eq!(gen.length(), DEFAULT_ID_LENGTH);

        let ids = gen.into_generator();
        let (a, b) = (ids(), ids());
        assert_eq!(a.len(), DEFAULT_ID_LENGTH);
        assert_ne!(a, b);
    }

    #[test]
    fn concurrent_generation_stays_unique() {
        let gen = default_id_gen();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gen = Arc::clone(&gen);
                std::thread::spawn(move || (0..1_000).map(|_| gen()).collect::<Vec<_>>())
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.extend(handle.join().unwrap());
        }
        assert_eq!(ids.len(), 8_000);
    }

    #[test]
    fn uuid_ids_parse() {
        let id = uuid_id_gen()();
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn fallback_on_error() {
        let gen = id_gen_with_fallback(|| Err::<String, _>("entropy unavailable"), "none");
        assert_eq!(gen(), "none");

        let gen = id_gen_with_fallback(|| Ok::<_, std::io::Error>("abc".to_string()), "none");
        assert_eq!(gen(), "abc");
    }
}
