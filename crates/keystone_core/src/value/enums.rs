//! Enum-typed properties.
//!
//! An enum value is stored as its underlying `i32` in the low 32 bits of
//! either slot width. Flags enums are bit masks over the same lane.

/// An enumeration that can be stored in a property slot.
///
/// Usually implemented through [`property_enum!`](crate::property_enum).
pub trait PropertyEnum: Copy + Sized + 'static {
    /// Type name shown in reports and used as the enum info key.
    const NAME: &'static str;

    /// Every member in declaration order, as `(name, underlying value)`.
    const MEMBERS: &'static [(&'static str, i32)];

    /// Whether members are combinable bit flags.
    const FLAGS: bool;

    /// Underlying value of this member.
    fn to_raw(self) -> i32;

    /// Member with the given underlying value, if any.
    fn from_raw(raw: i32) -> Option<Self>;

    /// Name of the member with the given underlying value.
    #[must_use]
    fn member_name(raw: i32) -> Option<&'static str> {
        Self::MEMBERS
            .iter()
            .find(|(_, value)| *value == raw)
            .map(|(name, _)| *name)
    }
}

/// Returns `true` if any bit of `flag` is set in `raw`.
#[inline]
#[must_use]
pub const fn has_flag(raw: i32, flag: i32) -> bool {
    raw & flag != 0
}

/// Returns `raw` with the bits of `flag` set.
#[inline]
#[must_use]
pub const fn add_flag(raw: i32, flag: i32) -> i32 {
    raw | flag
}

/// Returns `raw` with the bits of `flag` cleared.
#[inline]
#[must_use]
pub const fn remove_flag(raw: i32, flag: i32) -> i32 {
    raw & !flag
}

/// Declares an `i32`-backed enum and implements [`PropertyEnum`] for it.
///
/// Use `enum` for plain enumerations and `flags` for bit masks.
///
/// # Example
///
/// ```rust,ignore
/// property_enum! {
///     /// Weapon a character spawns with.
///     pub enum WeaponType {
///         /// Melee
///         Sword = 0,
///         /// Ranged
///         Bow = 1,
///     }
/// }
///
/// property_enum! {
///     pub flags TagType {
///         Tag1 = 1,
///         Tag2 = 2,
///         Tag3 = 4,
///     }
/// }
/// ```
#[macro_export]
macro_rules! property_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal),* $(,)?
        }
    ) => {
        $crate::property_enum!(@emit false; $(#[$meta])* $vis $name { $($(#[$vmeta])* $variant = $value),* });
    };
    (
        $(#[$meta:meta])*
        $vis:vis flags $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal),* $(,)?
        }
    ) => {
        $crate::property_enum!(@emit true; $(#[$meta])* $vis $name { $($(#[$vmeta])* $variant = $value),* });
    };
    (
        @emit $flags:literal;
        $(#[$meta:meta])*
        $vis:vis $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal),*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(i32)]
        $vis enum $name {
            $($(#[$vmeta])* $variant = $value),*
        }

        impl $crate::PropertyEnum for $name {
            const NAME: &'static str = stringify!($name);
            const MEMBERS: &'static [(&'static str, i32)] = &[$((stringify!($variant), $value)),*];
            const FLAGS: bool = $flags;

            #[inline]
            fn to_raw(self) -> i32 {
                self as i32
            }

            fn from_raw(raw: i32) -> Option<Self> {
                match raw {
                    $($value => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}
