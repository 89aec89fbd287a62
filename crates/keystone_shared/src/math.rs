//! Composite value types assembled from grouped scalar properties.
//!
//! Each type is a `#[repr(C)]` run of `f32` components in member order
//! (`x y z w`, or `r g b a`), so a group's scalars map onto it one to one.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Declares a float vector with one public field per axis.
macro_rules! vector_type {
    ($(#[$meta:meta])* $name:ident, $len:literal, $($axis:ident: $doc:literal),+) => {
        $(#[$meta])*
        #[repr(C)]
        #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
        pub struct $name {
            $(
                #[doc = $doc]
                pub $axis: f32,
            )+
        }

        impl $name {
            /// Number of components.
            pub const LEN: usize = $len;

            /// All components zero.
            pub const ZERO: Self = Self { $($axis: 0.0),+ };

            /// Creates a vector from its components.
            #[must_use]
            pub const fn new($($axis: f32),+) -> Self {
                Self { $($axis),+ }
            }

            /// Components in axis order.
            #[must_use]
            pub const fn to_array(self) -> [f32; $len] {
                [$(self.$axis),+]
            }

            /// Vector from components in axis order.
            #[must_use]
            pub const fn from_array(components: [f32; $len]) -> Self {
                let [$($axis),+] = components;
                Self { $($axis),+ }
            }
        }

        impl From<[f32; $len]> for $name {
            fn from(components: [f32; $len]) -> Self {
                Self::from_array(components)
            }
        }
    };
}

vector_type!(
    /// Two-component group, e.g. a UV offset.
    Vec2, 2, x: "X component", y: "Y component"
);
vector_type!(
    /// Three-component group, e.g. a spawn position.
    Vec3, 3, x: "X component", y: "Y component", z: "Z component"
);
vector_type!(
    /// Four-component group.
    Vec4, 4, x: "X component", y: "Y component", z: "Z component", w: "W component"
);

/// RGBA color group. Channels a group does not store read as `1.0`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from its channels.
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Channels in `r g b a` order.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Color from channels in `r g b a` order.
    #[must_use]
    pub const fn from_array(channels: [f32; 4]) -> Self {
        let [r, g, b, a] = channels;
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_order() {
        assert_eq!(Vec3::new(1.0, 2.0, 3.0).to_array(), [1.0, 2.0, 3.0]);
        assert_eq!(Vec4::from([1.0, 2.0, 3.0, 4.0]).w, 4.0);
        assert_eq!(Vec2::from_array([5.0, 6.0]), Vec2::new(5.0, 6.0));
        assert_eq!(Color::rgba(0.1, 0.2, 0.3, 0.4).to_array(), [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(Vec3::LEN, 3);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Color::default(), Color::WHITE);
        assert_eq!(Vec4::default(), Vec4::ZERO);
    }

    #[test]
    fn test_layout_matches_components() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(bytemuck::bytes_of(&v).len(), 3 * 4);

        let c: [f32; 4] = bytemuck::cast(Color::WHITE);
        assert_eq!(c, [1.0; 4]);
    }
}
