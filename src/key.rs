//! Key kinds understood by the containers.
//!
//! A key decides how it is fed to a [`Hasher`] and, through [`Eq`], how it is
//! compared. Byte-string keys are fed byte by byte, so an FNV-1a hasher sees
//! exactly the key bytes. Fixed-width integers are widened to 64 bits and fed
//! as one integer. Inside a tuple, byte-string components are length-prefixed.
//! The key type of a table is fixed at compile time, so keys of different
//! kinds or widths can never meet in a comparison.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::BuildHasher;
use core::hash::Hasher;

mod private {
    pub trait Sealed {}
}

/// A key that can be stored in a [`HashMap`](crate::HashMap) or
/// [`HashSet`](crate::HashSet).
///
/// This trait is sealed. It is implemented for string and byte-string types,
/// the primitive integers, `char`, references to keys, and tuples of two or
/// three keys.
///
/// Owned and borrowed forms of the same key hash identically, so a
/// `HashMap<String, _>` can be queried with a `&str`.
pub trait Key: Eq + private::Sealed {
    /// Feeds this key into `state`.
    fn write_key<H: Hasher>(&self, state: &mut H);

    /// Feeds this key into `state` as one component of a tuple key.
    ///
    /// Variable-length kinds prefix their length so that neighbouring
    /// components cannot trade bytes and still hash alike.
    #[inline]
    fn write_key_in_tuple<H: Hasher>(&self, state: &mut H) {
        self.write_key(state);
    }

    /// Returns `true` for zero-length keys, which containers refuse to store.
    #[inline]
    fn is_empty_key(&self) -> bool {
        false
    }
}

/// Hashes `key` with a fresh hasher from `hash_builder`.
#[inline]
pub fn make_hash<Q, S>(hash_builder: &S, key: &Q) -> u64
where
    Q: Key + ?Sized,
    S: BuildHasher,
{
    let mut state = hash_builder.build_hasher();
    key.write_key(&mut state);
    state.finish()
}

macro_rules! byte_string_key {
    ($($ty:ty => |$this:ident| $bytes:expr),* $(,)?) => {
        $(
            impl private::Sealed for $ty {}

            impl Key for $ty {
                #[inline]
                fn write_key<H: Hasher>(&self, state: &mut H) {
                    let $this = self;
                    state.write($bytes);
                }

                #[inline]
                fn write_key_in_tuple<H: Hasher>(&self, state: &mut H) {
                    let $this = self;
                    let bytes: &[u8] = $bytes;
                    state.write_usize(bytes.len());
                    state.write(bytes);
                }

                #[inline]
                fn is_empty_key(&self) -> bool {
                    let $this = self;
                    $bytes.is_empty()
                }
            }
        )*
    };
}

byte_string_key! {
    str => |s| s.as_bytes(),
    String => |s| s.as_bytes(),
    Box<str> => |s| s.as_bytes(),
    [u8] => |b| b,
    Vec<u8> => |b| b.as_slice(),
    Box<[u8]> => |b| b,
}

macro_rules! signed_key {
    ($($ty:ty),*) => {
        $(
            impl private::Sealed for $ty {}

            impl Key for $ty {
                #[inline]
                fn write_key<H: Hasher>(&self, state: &mut H) {
                    state.write_i64(*self as i64);
                }
            }
        )*
    };
}

macro_rules! unsigned_key {
    ($($ty:ty),*) => {
        $(
            impl private::Sealed for $ty {}

            impl Key for $ty {
                #[inline]
                fn write_key<H: Hasher>(&self, state: &mut H) {
                    state.write_u64(*self as u64);
                }
            }
        )*
    };
}

signed_key!(i8, i16, i32, i64, isize);
unsigned_key!(u8, u16, u32, u64, usize, char);

impl<T: Key + ?Sized> private::Sealed for &T {}

impl<T: Key + ?Sized> Key for &T {
    #[inline]
    fn write_key<H: Hasher>(&self, state: &mut H) {
        (**self).write_key(state);
    }

    #[inline]
    fn write_key_in_tuple<H: Hasher>(&self, state: &mut H) {
        (**self).write_key_in_tuple(state);
    }

    #[inline]
    fn is_empty_key(&self) -> bool {
        (**self).is_empty_key()
    }
}

macro_rules! tuple_key {
    ($($name:ident),+) => {
        impl<$($name: Key),+> private::Sealed for ($($name,)+) {}

        impl<$($name: Key),+> Key for ($($name,)+) {
            #[inline]
            #[allow(non_snake_case)]
            fn write_key<H: Hasher>(&self, state: &mut H) {
                let ($($name,)+) = self;
                $($name.write_key_in_tuple(state);)+
            }

            #[inline]
            #[allow(non_snake_case)]
            fn is_empty_key(&self) -> bool {
                let ($($name,)+) = self;
                false $(|| $name.is_empty_key())+
            }
        }
    };
}

tuple_key!(A, B);
tuple_key!(A, B, C);

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;
    use crate::fnv::FnvBuildHasher;
    use crate::fnv::fnv1a;

    #[test]
    fn owned_and_borrowed_strings_agree() {
        let builder = FnvBuildHasher::default();
        let owned = "hello".to_string();
        let boxed: Box<str> = "hello".into();

        assert_eq!(make_hash(&builder, "hello"), fnv1a(b"hello"));
        assert_eq!(make_hash(&builder, &owned), make_hash(&builder, "hello"));
        assert_eq!(make_hash(&builder, &boxed), make_hash(&builder, "hello"));
        assert_eq!(make_hash(&builder, &&owned), make_hash(&builder, "hello"));
    }

    #[test]
    fn byte_strings_agree_with_strings() {
        let builder = FnvBuildHasher::default();
        let bytes = vec![b'f', b'o', b'o'];
        assert_eq!(make_hash(&builder, &bytes), make_hash(&builder, "foo"));
        assert_eq!(make_hash(&builder, &bytes[..]), fnv1a(b"foo"));
    }

    #[test]
    fn integers_widen_before_hashing() {
        let builder = FnvBuildHasher::default();
        assert_eq!(make_hash(&builder, &7u8), make_hash(&builder, &7u64));
        assert_eq!(make_hash(&builder, &-3i16), make_hash(&builder, &-3i64));
        assert_ne!(make_hash(&builder, &1u32), make_hash(&builder, &2u32));
    }

    #[test]
    fn tuples_hash_components_in_order() {
        let builder = FnvBuildHasher::default();
        let ab = make_hash(&builder, &("a", "b"));
        let ba = make_hash(&builder, &("b", "a"));
        assert_ne!(ab, ba);
        assert_ne!(ab, fnv1a(b"ab"));
    }

    fn assert_split_points_differ<S: BuildHasher>(builder: &S) {
        assert_ne!(
            make_hash(builder, &("a", "bc")),
            make_hash(builder, &("ab", "c"))
        );
        assert_ne!(
            make_hash(builder, &("abc", "d")),
            make_hash(builder, &("a", "bcd"))
        );
        assert_ne!(
            make_hash(builder, &("a".to_string(), "b", "c")),
            make_hash(builder, &("a".to_string(), "bc", "\0"))
        );
        assert_ne!(
            make_hash(builder, &(&b"x\xff"[..], &b"y"[..])),
            make_hash(builder, &(&b"x"[..], &b"\xffy"[..]))
        );
    }

    #[test]
    fn tuple_components_keep_their_boundaries() {
        assert_split_points_differ(&FnvBuildHasher::default());
    }

    #[test]
    #[cfg(feature = "std")]
    fn tuple_components_keep_their_boundaries_under_seeded_hashing() {
        assert_split_points_differ(&std::collections::hash_map::RandomState::new());
    }

    #[test]
    fn plain_keys_are_not_length_prefixed() {
        let builder = FnvBuildHasher::default();
        assert_eq!(make_hash(&builder, "foo"), fnv1a(b"foo"));
        assert_eq!(make_hash(&builder, &&b"foo"[..]), fnv1a(b"foo"));
    }

    #[test]
    fn empty_keys_are_detected() {
        assert!("".is_empty_key());
        assert!(String::new().is_empty_key());
        assert!(Vec::<u8>::new().is_empty_key());
        assert!(("x", "").is_empty_key());
        assert!(!"x".is_empty_key());
        assert!(!0u64.is_empty_key());
        assert!(!(1i32, "y").is_empty_key());
    }
}
