//! The `property_keys!` registration macro.

/// Declares a key enum together with its schema.
///
/// Each member is `Name = value`, optionally followed by `=> builder`, where
/// the builder is a closure over [`KeyDescriptor`](crate::KeyDescriptor).
/// Members without a builder are plain `Int` keys.
///
/// The generated enum gets `ALL`, `key()`, `from_key()`, `name()`,
/// `schema()` and `From<Enum> for Key`.
///
/// # Example
///
/// ```rust,ignore
/// property_keys! {
///     /// Designer-facing character attributes.
///     pub enum CharacterKeys {
///         None = 0 => |d| d.hidden(),
///         Health = 1 => |d| d.int().range(0.0, 1000.0).default_value(100),
///         IsBoss = 2 => |d| d.bool().default_value(true),
///         PosX = 10 => |d| d.float().group("Spawn Position"),
///         Level = 20,
///     }
/// }
///
/// let schema = CharacterKeys::schema()?;
/// set.set(CharacterKeys::Health, 250_i32);
/// ```
#[macro_export]
macro_rules! property_keys {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $value:literal $(=> $build:expr)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(i32)]
        $vis enum $name {
            $($(#[$vmeta])* $variant = $value),*
        }

        impl $name {
            /// Every key in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Underlying key value.
            #[inline]
            #[must_use]
            pub const fn key(self) -> $crate::Key {
                self as $crate::Key
            }

            /// Member with the given key value.
            #[must_use]
            pub const fn from_key(key: $crate::Key) -> Option<Self> {
                match key {
                    $($value => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Member name.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                }
            }

            /// Builds the schema declared for this key enum.
            ///
            /// # Errors
            ///
            /// Any registration error of the declared descriptors.
            pub fn schema() -> $crate::MetaResult<$crate::KeySchema> {
                let mut schema = $crate::KeySchema::new(stringify!($name));
                $(
                    schema.register(
                        $crate::KeyDescriptor::new($value, stringify!($variant))
                            $(.configure($build))?
                    )?;
                )*
                Ok(schema)
            }
        }

        impl From<$name> for $crate::Key {
            #[inline]
            fn from(key: $name) -> Self {
                key.key()
            }
        }
    };
}
