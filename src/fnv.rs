//! FNV-1a hashing.
//!
//! The offset basis and prime follow the platform word width. This hash is
//! fast and well distributed for short keys but offers no protection against
//! adversarial collisions; use a seeded builder such as `FoldHashBuilder`
//! (feature `foldhash`) when keys come from untrusted input.

use core::hash::BuildHasherDefault;
use core::hash::Hasher;

cfg_if::cfg_if! {
    if #[cfg(target_pointer_width = "64")] {
        type Word = u64;

        /// FNV offset basis for the platform word width.
        pub const OFFSET_BASIS: u64 = 14695981039346656037;
        /// FNV prime for the platform word width.
        pub const PRIME: u64 = 1099511628211;
    } else {
        type Word = u32;

        /// FNV offset basis for the platform word width.
        pub const OFFSET_BASIS: u64 = 2166136261;
        /// FNV prime for the platform word width.
        pub const PRIME: u64 = 16777619;
    }
}

/// Hashes a byte string with FNV-1a.
///
/// This is the hash every byte-string key receives under
/// [`FnvBuildHasher`].
///
/// # Examples
///
/// ```rust
/// use probe_hash::fnv::FnvBuildHasher;
/// use probe_hash::fnv::fnv1a;
/// use probe_hash::key::make_hash;
///
/// let builder = FnvBuildHasher::default();
/// assert_eq!(make_hash(&builder, "foo"), fnv1a(b"foo"));
/// ```
pub const fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = OFFSET_BASIS as Word;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as Word;
        hash = hash.wrapping_mul(PRIME as Word);
        i += 1;
    }
    hash as u64
}

/// An FNV-1a [`Hasher`].
///
/// Byte slices are folded in one byte at a time. Fixed-width integers are
/// folded in one platform word per round: a single XOR and multiply on 64-bit
/// targets. On 32-bit targets a `u64` takes two rounds, low word first, while
/// narrower integers still take one.
#[derive(Debug, Clone, Copy)]
pub struct FnvHasher {
    hash: Word,
}

impl Default for FnvHasher {
    #[inline]
    fn default() -> Self {
        Self {
            hash: OFFSET_BASIS as Word,
        }
    }
}

impl FnvHasher {
    #[inline(always)]
    fn mix(&mut self, blob: Word) {
        self.hash ^= blob;
        self.hash = self.hash.wrapping_mul(PRIME as Word);
    }

    #[inline(always)]
    fn mix_u64(&mut self, value: u64) {
        cfg_if::cfg_if! {
            if #[cfg(target_pointer_width = "64")] {
                self.mix(value);
            } else {
                self.mix(value as Word);
                self.mix((value >> 32) as Word);
            }
        }
    }
}

impl Hasher for FnvHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash as u64
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.mix(byte as Word);
        }
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.mix(i as Word);
    }

    #[inline]
    fn write_u16(&mut self, i: u16) {
        self.mix(i as Word);
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.mix(i as Word);
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.mix_u64(i);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.mix_u64(i as u64);
    }

    #[inline]
    fn write_i8(&mut self, i: i8) {
        self.mix_u64(i as i64 as u64);
    }

    #[inline]
    fn write_i16(&mut self, i: i16) {
        self.mix_u64(i as i64 as u64);
    }

    #[inline]
    fn write_i32(&mut self, i: i32) {
        self.mix_u64(i as i64 as u64);
    }

    #[inline]
    fn write_i64(&mut self, i: i64) {
        self.mix_u64(i as u64);
    }

    #[inline]
    fn write_isize(&mut self, i: isize) {
        self.mix_u64(i as i64 as u64);
    }
}

/// The default hash builder of every container in this crate.
pub type FnvBuildHasher = BuildHasherDefault<FnvHasher>;
