use std::ops::Mul;

use glam::{Mat4, Quat, Vec3, Vec4};

/// Oriented plane element of a rotor, stored as its xy, xz and yz parts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bivector3 {
    pub xy: f32,
    pub xz: f32,
    pub yz: f32,
}

impl Bivector3 {
    pub const ZERO: Bivector3 = Bivector3 {
        xy: 0.0,
        xz: 0.0,
        yz: 0.0,
    };

    pub fn new(xy: f32, xz: f32, yz: f32) -> Self {
        Self { xy, xz, yz }
    }

    pub fn length_squared(&self) -> f32 {
        self.xy * self.xy + self.xz * self.xz + self.yz * self.yz
    }
}

/// A 3D rotation in geometric-algebra form: scalar plus bivector.
///
/// Equivalent to a unit quaternion with `w = scalar`, `x = -yz`, `y = xz`,
/// `z = -xy`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotor3 {
    pub scalar: f32,
    pub bivector: Bivector3,
}

impl Default for Rotor3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Rotor3 {
    pub const IDENTITY: Rotor3 = Rotor3 {
        scalar: 1.0,
        bivector: Bivector3::ZERO,
    };

    pub fn new(scalar: f32, bivector: Bivector3) -> Self {
        Self { scalar, bivector }
    }

    pub fn from_quat(q: Quat) -> Self {
        Self::new(q.w, Bivector3::new(-q.z, q.y, -q.x))
    }

    pub fn to_quat(self) -> Quat {
        let b = self.bivector;
        Quat::from_xyzw(-b.yz, b.xz, -b.xy, self.scalar)
    }

    pub fn length_squared(&self) -> f32 {
        self.scalar * self.scalar + self.bivector.length_squared()
    }

    /// Unit-length copy; a zero rotor normalizes to the identity.
    pub fn normalize(self) -> Self {
        let len = self.length_squared().sqrt();
        if len <= f32::EPSILON {
            return Self::IDENTITY;
        }
        let b = self.bivector;
        Self::new(
            self.scalar / len,
            Bivector3::new(b.xy / len, b.xz / len, b.yz / len),
        )
    }

    /// The inverse rotation of a unit rotor.
    pub fn reverse(self) -> Self {
        let b = self.bivector;
        Self::new(self.scalar, Bivector3::new(-b.xy, -b.xz, -b.yz))
    }

    pub fn rotate(self, v: Vec3) -> Vec3 {
        self.to_quat() * v
    }
}

impl Mul for Rotor3 {
    type Output = Rotor3;

    fn mul(self, t: Rotor3) -> Rotor3 {
        let (sa, s) = (self.scalar, self.bivector);
        let (ta, t) = (t.scalar, t.bivector);
        Rotor3::new(
            sa * ta - s.xy * t.xy - s.xz * t.xz - s.yz * t.yz,
            Bivector3::new(
                s.xy * ta + sa * t.xy + s.yz * t.xz - s.xz * t.yz,
                s.xz * ta + sa * t.xz - s.yz * t.xy + s.xy * t.yz,
                s.yz * ta + sa * t.yz + s.xz * t.xy - s.xy * t.xz,
            ),
        )
    }
}

/// Orientation, position and non-uniform scale of a transform node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub orientation: Rotor3,
    pub position: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        orientation: Rotor3::IDENTITY,
        position: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    /// Local-to-parent matrix: scale, then rotate, then translate.
    pub fn to_matrix(&self) -> Mat4 {
        let q = self.orientation.to_quat();
        let rotation = Quat::from_vec4(Vec4::from(q).try_normalize().unwrap_or(Vec4::W));
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}
