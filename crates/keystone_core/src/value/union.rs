//! # Value Unions
//!
//! Reinterpretation of a raw slot as `int`, `float`, `bool` and, on the
//! 64-bit slot, `long` and `double`.
//!
//! Writes and reads go through [`bytemuck::cast`], so the round trip is
//! bit-exact for every value including NaN payloads and `-0.0`.

use bytemuck::Pod;
use std::fmt;

/// Width of a raw slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotWidth {
    /// 32-bit slot (`i32` storage).
    Bit32,
    /// 64-bit slot (`i64` storage).
    Bit64,
}

/// A raw storage cell.
///
/// Implemented by `i32` and `i64` only. The low 32 bits are the lane that
/// narrow values (int, float, bool, enum) occupy.
pub trait Slot: Pod + Default + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Width of this slot.
    const WIDTH: SlotWidth;

    /// Builds a slot whose low 32 bits are `bits` and whose remaining bits are zero.
    fn from_low_bits(bits: u32) -> Self;

    /// Returns the low 32 bits of the slot.
    fn low_bits(self) -> u32;

    /// Returns `true` if every bit of the slot is zero.
    fn is_zero(self) -> bool;
}

impl Slot for i32 {
    const WIDTH: SlotWidth = SlotWidth::Bit32;

    #[inline]
    fn from_low_bits(bits: u32) -> Self {
        bytemuck::cast(bits)
    }

    #[inline]
    fn low_bits(self) -> u32 {
        bytemuck::cast(self)
    }

    #[inline]
    fn is_zero(self) -> bool {
        self == 0
    }
}

impl Slot for i64 {
    const WIDTH: SlotWidth = SlotWidth::Bit64;

    #[inline]
    fn from_low_bits(bits: u32) -> Self {
        i64::from(bits)
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn low_bits(self) -> u32 {
        self as u32
    }

    #[inline]
    fn is_zero(self) -> bool {
        self == 0
    }
}

/// A value that can be written into and read back out of a slot of type `S`.
///
/// There is no validation in either direction. Decoding a slot that was
/// written as another type reinterprets the bits.
pub trait SlotValue<S: Slot>: Sized {
    /// Encodes the value into a raw slot.
    fn encode(self) -> S;

    /// Decodes a raw slot as this type.
    fn decode(raw: S) -> Self;
}

impl<S: Slot> SlotValue<S> for i32 {
    #[inline]
    fn encode(self) -> S {
        S::from_low_bits(bytemuck::cast(self))
    }

    #[inline]
    fn decode(raw: S) -> Self {
        bytemuck::cast(raw.low_bits())
    }
}

impl<S: Slot> SlotValue<S> for f32 {
    #[inline]
    fn encode(self) -> S {
        S::from_low_bits(self.to_bits())
    }

    #[inline]
    fn decode(raw: S) -> Self {
        f32::from_bits(raw.low_bits())
    }
}

impl<S: Slot> SlotValue<S> for bool {
    #[inline]
    fn encode(self) -> S {
        S::from_low_bits(u32::from(self))
    }

    /// Any nonzero slot reads as `true`.
    #[inline]
    fn decode(raw: S) -> Self {
        !raw.is_zero()
    }
}

impl SlotValue<i64> for i64 {
    #[inline]
    fn encode(self) -> i64 {
        self
    }

    #[inline]
    fn decode(raw: i64) -> Self {
        raw
    }
}

impl SlotValue<i64> for f64 {
    #[inline]
    fn encode(self) -> i64 {
        bytemuck::cast(self)
    }

    #[inline]
    fn decode(raw: i64) -> Self {
        bytemuck::cast(raw)
    }
}

/// The primitive interpretations a slot supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// 32-bit signed integer.
    Int,
    /// 32-bit IEEE float.
    Float,
    /// Boolean, nonzero is `true`.
    Bool,
    /// 64-bit signed integer. 64-bit slot only.
    Long,
    /// 64-bit IEEE float. 64-bit slot only.
    Double,
}

impl SlotKind {
    /// Narrowest slot that can hold this kind.
    #[must_use]
    pub const fn min_width(self) -> SlotWidth {
        match self {
            Self::Int | Self::Float | Self::Bool => SlotWidth::Bit32,
            Self::Long | Self::Double => SlotWidth::Bit64,
        }
    }
}

/// A decoded slot value together with the kind it was decoded as.
#[derive(Clone, Copy, Debug)]
pub enum Scalar {
    /// 32-bit signed integer.
    Int(i32),
    /// 32-bit float.
    Float(f32),
    /// Boolean.
    Bool(bool),
    /// 64-bit signed integer.
    Long(i64),
    /// 64-bit float.
    Double(f64),
}

impl Scalar {
    /// Returns the kind of this scalar.
    #[must_use]
    pub const fn kind(self) -> SlotKind {
        match self {
            Self::Int(_) => SlotKind::Int,
            Self::Float(_) => SlotKind::Float,
            Self::Bool(_) => SlotKind::Bool,
            Self::Long(_) => SlotKind::Long,
            Self::Double(_) => SlotKind::Double,
        }
    }

    /// Bit-pattern equality. Two NaNs with the same payload are equal,
    /// `0.0` and `-0.0` are not.
    #[must_use]
    pub fn bit_eq(self, other: Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

/// 32-bit value union.
///
/// The same `raw` is readable as every 32-bit kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ValueUnion32 {
    /// The raw slot bits.
    pub raw: i32,
}

impl ValueUnion32 {
    /// Wraps a raw slot.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Self { raw }
    }

    /// Encodes an integer.
    #[inline]
    #[must_use]
    pub fn from_int(value: i32) -> Self {
        Self::from_raw(value.encode())
    }

    /// Encodes a float.
    #[inline]
    #[must_use]
    pub fn from_float(value: f32) -> Self {
        Self::from_raw(value.encode())
    }

    /// Encodes a boolean as `1` or `0`.
    #[inline]
    #[must_use]
    pub fn from_bool(value: bool) -> Self {
        Self::from_raw(value.encode())
    }

    /// Reads the slot as an integer.
    #[inline]
    #[must_use]
    pub fn as_int(self) -> i32 {
        SlotValue::decode(self.raw)
    }

    /// Reads the slot as a float.
    #[inline]
    #[must_use]
    pub fn as_float(self) -> f32 {
        SlotValue::decode(self.raw)
    }

    /// Reads the slot as a boolean (nonzero is `true`).
    #[inline]
    #[must_use]
    pub fn as_bool(self) -> bool {
        SlotValue::decode(self.raw)
    }

    /// Encodes a scalar. Returns `None` for `Long` and `Double`, which do
    /// not fit a 32-bit slot.
    #[must_use]
    pub fn encode(value: Scalar) -> Option<Self> {
        match value {
            Scalar::Int(v) => Some(Self::from_int(v)),
            Scalar::Float(v) => Some(Self::from_float(v)),
            Scalar::Bool(v) => Some(Self::from_bool(v)),
            Scalar::Long(_) | Scalar::Double(_) => None,
        }
    }

    /// Decodes the slot as `kind`. Returns `None` for `Long` and `Double`.
    #[must_use]
    pub fn decode(self, kind: SlotKind) -> Option<Scalar> {
        match kind {
            SlotKind::Int => Some(Scalar::Int(self.as_int())),
            SlotKind::Float => Some(Scalar::Float(self.as_float())),
            SlotKind::Bool => Some(Scalar::Bool(self.as_bool())),
            SlotKind::Long | SlotKind::Double => None,
        }
    }
}

/// 64-bit value union.
///
/// Narrow kinds use the low 32 bits; `long` and `double` use all 64.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ValueUnion64 {
    /// The raw slot bits.
    pub raw: i64,
}

impl ValueUnion64 {
    /// Wraps a raw slot.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self { raw }
    }

    /// Encodes an integer into the low 32 bits.
    #[inline]
    #[must_use]
    pub fn from_int(value: i32) -> Self {
        Self::from_raw(value.encode())
    }

    /// Encodes a float into the low 32 bits.
    #[inline]
    #[must_use]
    pub fn from_float(value: f32) -> Self {
        Self::from_raw(value.encode())
    }

    /// Encodes a boolean as `1` or `0`.
    #[inline]
    #[must_use]
    pub fn from_bool(value: bool) -> Self {
        Self::from_raw(value.encode())
    }

    /// Encodes a 64-bit integer.
    #[inline]
    #[must_use]
    pub const fn from_long(value: i64) -> Self {
        Self::from_raw(value)
    }

    /// Encodes a 64-bit float.
    #[inline]
    #[must_use]
    pub fn from_double(value: f64) -> Self {
        Self::from_raw(value.encode())
    }

    /// Reads the low 32 bits as an integer.
    #[inline]
    #[must_use]
    pub fn as_int(self) -> i32 {
        SlotValue::decode(self.raw)
    }

    /// Reads the low 32 bits as a float.
    #[inline]
    #[must_use]
    pub fn as_float(self) -> f32 {
        SlotValue::decode(self.raw)
    }

    /// Reads the slot as a boolean (nonzero is `true`).
    #[inline]
    #[must_use]
    pub fn as_bool(self) -> bool {
        SlotValue::decode(self.raw)
    }

    /// Reads the slot as a 64-bit integer.
    #[inline]
    #[must_use]
    pub const fn as_long(self) -> i64 {
        self.raw
    }

    /// Reads the slot as a 64-bit float.
    #[inline]
    #[must_use]
    pub fn as_double(self) -> f64 {
        SlotValue::decode(self.raw)
    }

    /// Encodes any scalar.
    #[must_use]
    pub fn encode(value: Scalar) -> Self {
        match value {
            Scalar::Int(v) => Self::from_int(v),
            Scalar::Float(v) => Self::from_float(v),
            Scalar::Bool(v) => Self::from_bool(v),
            Scalar::Long(v) => Self::from_long(v),
            Scalar::Double(v) => Self::from_double(v),
        }
    }

    /// Decodes the slot as `kind`.
    #[must_use]
    pub fn decode(self, kind: SlotKind) -> Scalar {
        match kind {
            SlotKind::Int => Scalar::Int(self.as_int()),
            SlotKind::Float => Scalar::Float(self.as_float()),
            SlotKind::Bool => Scalar::Bool(self.as_bool()),
            SlotKind::Long => Scalar::Long(self.as_long()),
            SlotKind::Double => Scalar::Double(self.as_double()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS_32: [SlotKind; 3] = [SlotKind::Int, SlotKind::Float, SlotKind::Bool];

    fn edge_scalars() -> Vec<Scalar> {
        vec![
            Scalar::Int(0),
            Scalar::Int(i32::MIN),
            Scalar::Int(i32::MAX),
            Scalar::Int(-1),
            Scalar::Float(0.0),
            Scalar::Float(-0.0),
            Scalar::Float(-3.5),
            Scalar::Float(f32::NAN),
            Scalar::Float(f32::from_bits(0x7fc0_1234)),
            Scalar::Float(f32::INFINITY),
            Scalar::Float(f32::NEG_INFINITY),
            Scalar::Float(f32::MIN_POSITIVE),
            Scalar::Bool(true),
            Scalar::Bool(false),
            Scalar::Long(i64::MIN),
            Scalar::Long(i64::MAX),
            Scalar::Long(0),
            Scalar::Double(f64::NAN),
            Scalar::Double(f64::NEG_INFINITY),
            Scalar::Double(-0.0),
            Scalar::Double(std::f64::consts::PI),
        ]
    }

    #[test]
    fn test_round_trip_64_is_bit_exact() {
        for value in edge_scalars() {
            let decoded = ValueUnion64::encode(value).decode(value.kind());
            assert!(decoded.bit_eq(value), "{value:?} came back as {decoded:?}");
        }
    }

    #[test]
    fn test_round_trip_32_is_bit_exact() {
        for value in edge_scalars() {
            match ValueUnion32::encode(value) {
                Some(union) => {
                    let decoded = union.decode(value.kind()).unwrap();
                    assert!(decoded.bit_eq(value), "{value:?} came back as {decoded:?}");
                }
                None => assert_eq!(value.kind().min_width(), SlotWidth::Bit64),
            }
        }
    }

    #[test]
    fn test_every_pattern_decodes() {
        for raw in [0, 1, -1, i32::MIN, 0x7f80_0001] {
            let union = ValueUnion32::from_raw(raw);
            for kind in KINDS_32 {
                assert!(union.decode(kind).is_some());
            }
        }
        assert!(ValueUnion32::from_raw(0).decode(SlotKind::Long).is_none());
    }

    #[test]
    fn test_bool_reads_nonzero_as_true() {
        assert!(!ValueUnion32::from_int(0).as_bool());
        assert!(ValueUnion32::from_int(2).as_bool());
        assert!(ValueUnion32::from_int(i32::MIN).as_bool());
        // -0.0 is a nonzero bit pattern
        assert!(ValueUnion32::from_float(-0.0).as_bool());
        assert!(!ValueUnion32::from_float(0.0).as_bool());

        assert!(ValueUnion64::from_long(1 << 40).as_bool());
        assert_eq!(ValueUnion32::from_bool(true).raw, 1);
        assert_eq!(ValueUnion64::from_bool(false).raw, 0);
    }

    #[test]
    fn test_float_reinterpreted_as_int() {
        let union = ValueUnion32::from_float(1.0);
        assert_eq!(union.as_int(), 0x3f80_0000);
        assert_eq!(ValueUnion32::from_int(0x4000_0000).as_float(), 2.0);
    }

    #[test]
    fn test_narrow_values_use_low_half_of_64() {
        let union = ValueUnion64::from_int(-1);
        assert_eq!(union.raw, 0xffff_ffff);
        assert_eq!(union.as_int(), -1);

        let union = ValueUnion64::from_float(1.5);
        assert_eq!(union.raw >> 32, 0);
        assert_eq!(union.as_float(), 1.5);

        // Upper half is ignored by narrow reads
        let union = ValueUnion64::from_raw((7_i64 << 32) | 5);
        assert_eq!(union.as_int(), 5);
    }
}
