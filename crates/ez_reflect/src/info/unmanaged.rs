use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;
use core::marker::PhantomData;

// -----------------------------------------------------------------------------
// Unmanaged

/// A plain value with a fixed-size little-endian byte form.
///
/// `write_le` receives exactly `SIZE` bytes, `read_le` is given exactly
/// `SIZE` bytes. `read_le` cannot fail: every byte pattern decodes to some
/// value, so it does not validate its input. Implemented for the numeric primitives, `bool`, fixed-size
/// arrays of unmanaged values, and by `#[derive(Reflect)]` with
/// `#[reflect(unmanaged)]` (fields concatenated in declaration order).
///
/// # Examples
///
/// ```
/// use ez_reflect::info::Unmanaged;
///
/// let mut bytes = [0_u8; 8];
/// <[u16; 4]>::write_le(&[1, 2, 3, 0xFFFF], &mut bytes);
/// assert_eq!(bytes, [1, 0, 2, 0, 3, 0, 0xFF, 0xFF]);
/// assert_eq!(<[u16; 4]>::read_le(&bytes), [1, 2, 3, 0xFFFF]);
/// ```
pub trait Unmanaged: Copy + Send + Sync + 'static {
    /// Encoded size in bytes.
    const SIZE: usize;

    fn write_le(&self, out: &mut [u8]);

    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_unmanaged_num {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Unmanaged for $ty {
                const SIZE: usize = size_of::<$ty>();

                #[inline]
                fn write_le(&self, out: &mut [u8]) {
                    out[..Self::SIZE].copy_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    let mut raw = [0_u8; size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_unmanaged_num!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

/// Writes `0x00` or `0x01`. Reading is lax: any non-zero byte is `true`.
///
/// Unlike the strict scalar `bool` of the binary format, a corrupt byte
/// inside a blob is not detected and re-encodes as `0x01`.
impl Unmanaged for bool {
    const SIZE: usize = 1;

    #[inline]
    fn write_le(&self, out: &mut [u8]) {
        out[0] = u8::from(*self);
    }

    #[inline]
    fn read_le(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

impl<T: Unmanaged, const N: usize> Unmanaged for [T; N] {
    const SIZE: usize = T::SIZE * N;

    fn write_le(&self, out: &mut [u8]) {
        if T::SIZE == 0 {
            return;
        }
        for (item, chunk) in self.iter().zip(out.chunks_exact_mut(T::SIZE)) {
            item.write_le(chunk);
        }
    }

    fn read_le(bytes: &[u8]) -> Self {
        core::array::from_fn(|i| T::read_le(&bytes[i * T::SIZE..]))
    }
}

// -----------------------------------------------------------------------------
// UnmanagedInfo

/// Erased [`Unmanaged`] operations, stored in the type metadata.
#[derive(Clone)]
pub struct UnmanagedInfo {
    size: usize,
    ops: Arc<dyn UnmanagedOps>,
}

trait UnmanagedOps: Send + Sync {
    fn write(&self, value: &dyn Any, out: &mut [u8]) -> bool;
    fn read(&self, bytes: &[u8]) -> Box<dyn Any>;
}

struct BlobOps<T>(PhantomData<fn() -> T>);

impl<T: Unmanaged> UnmanagedOps for BlobOps<T> {
    fn write(&self, value: &dyn Any, out: &mut [u8]) -> bool {
        match value.downcast_ref::<T>() {
            Some(value) => {
                value.write_le(out);
                true
            }
            None => false,
        }
    }

    fn read(&self, bytes: &[u8]) -> Box<dyn Any> {
        Box::new(T::read_le(bytes))
    }
}

impl UnmanagedInfo {
    /// Creates the info for `T`.
    pub fn of<T: Unmanaged>() -> Self {
        Self {
            size: T::SIZE,
            ops: Arc::new(BlobOps::<T>(PhantomData)),
        }
    }

    /// Returns the encoded size in bytes.
    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Encodes `value` into the first [`size`](Self::size) bytes of `out`.
    ///
    /// Returns `false` if `value` has another type.
    #[inline]
    pub fn write(&self, value: &dyn Any, out: &mut [u8]) -> bool {
        self.ops.write(value, out)
    }

    /// Decodes a value from the first [`size`](Self::size) bytes of `bytes`.
    #[inline]
    pub fn read(&self, bytes: &[u8]) -> Box<dyn Any> {
        self.ops.read(bytes)
    }
}

impl fmt::Debug for UnmanagedInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnmanagedInfo")
            .field("size", &self.size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Unmanaged, UnmanagedInfo};

    #[test]
    fn floats_are_little_endian() {
        let mut out = [0_u8; 4];
        1.0_f32.write_le(&mut out);
        assert_eq!(out, [0x00, 0x00, 0x80, 0x3F]);
        assert_eq!(f32::read_le(&out), 1.0);
    }

    #[test]
    fn bool_blobs_decode_non_zero_as_true() {
        assert!(!bool::read_le(&[0]));
        assert!(bool::read_le(&[1]));
        assert!(bool::read_le(&[7]));

        let mut out = [0xFF_u8];
        true.write_le(&mut out);
        assert_eq!(out, [1]);
    }

    #[test]
    fn erased_write_checks_type() {
        let info = UnmanagedInfo::of::<u32>();
        let mut out = [0_u8; 4];
        assert!(!info.write(&1_i32, &mut out));
        assert!(info.write(&0x0102_0304_u32, &mut out));
        assert_eq!(out, [4, 3, 2, 1]);
        assert_eq!(info.read(&out).downcast_ref::<u32>(), Some(&0x0102_0304));
    }
}
