use xxhash_rust::xxh3::Xxh3;

pub trait Digest {
    fn update(&mut self, data: impl AsRef<[u8]>);
}

pub trait Digestible {
    fn digest(&self, data: &mut impl Digest);
}

impl Digestible for [u8] {
    fn digest(&self, d: &mut impl Digest) {
        d.update(self)
    }
}

impl Digestible for Vec<u8> {
    fn digest(&self, d: &mut impl Digest) {
        d.update(self)
    }
}

/// xxh3 (64 bit) streaming digest.
#[derive(Default, Clone)]
pub struct Xxhash {
    state: Xxh3,
}

impl Xxhash {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(&self) -> u64 {
        self.state.digest()
    }
}

impl Digest for Xxhash {
    fn update(&mut self, data: impl AsRef<[u8]>) {
        self.state.update(data.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xxhash_is_stable_across_chunking() {
        let mut whole = Xxhash::new();
        b"hello world".to_vec().digest(&mut whole);

        let mut parts = Xxhash::new();
        b"hello".to_vec().digest(&mut parts);
        b" world".to_vec().digest(&mut parts);

        assert_eq!(whole.finish(), parts.finish());
    }

    #[test]
    fn xxhash_distinguishes_values() {
        let hash = |v: &[u8]| {
            let mut h = Xxhash::new();
            v.digest(&mut h);
            h.finish()
        };
        assert_ne!(hash(&b"1"[..]), hash(&b"2"[..]));
        assert_ne!(hash(&b""[..]), hash(&b"\0"[..]));
    }
}
