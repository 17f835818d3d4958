use glam::{DAffine2, DMat2, DVec2};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Determinants smaller than this are treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// 2D affine transform mapping the unit square centered at the origin onto a
/// world-space rectangle.
///
/// Element order is row-major 2x3, `[a, b, c, d, e, f]`:
///
/// ```text
/// x' = a*x + b*y + c
/// y' = d*x + e*y + f
/// ```
///
/// `translate`, `scale` and `rotate` post-multiply: each new operation is
/// applied *after* everything already accumulated, so
/// `m.scale(..); m.rotate(..); m.translate(..)` maps a point through scale,
/// then rotation, then translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mx(DAffine2);

/// Geometry recovered from a transform that maps the unit square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    pub center: DVec2,
    pub half_width: f64,
    pub half_height: f64,
    /// Angle of the local +x axis in radians.
    pub angle: f64,
}

impl Mx {
    pub const IDENTITY: Mx = Mx(DAffine2::IDENTITY);

    /// Build a transform from `[a, b, c, d, e, f]`.
    pub fn from_elements(e: [f64; 6]) -> Self {
        Mx(DAffine2::from_mat2_translation(
            DMat2::from_cols(DVec2::new(e[0], e[3]), DVec2::new(e[1], e[4])),
            DVec2::new(e[2], e[5]),
        ))
    }

    /// The six elements in `[a, b, c, d, e, f]` order.
    pub fn elements(&self) -> [f64; 6] {
        let m = self.0.matrix2;
        let t = self.0.translation;
        [m.x_axis.x, m.y_axis.x, t.x, m.x_axis.y, m.y_axis.y, t.y]
    }

    /// Axis-aligned rectangle of the given size centered at `center`.
    pub fn from_rect(center: DVec2, size: DVec2) -> Self {
        let mut m = Mx::IDENTITY;
        m.scale(size.x, size.y);
        m.translate(center.x, center.y);
        m
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.0 = DAffine2::from_translation(DVec2::new(dx, dy)) * self.0;
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.0 = DAffine2::from_scale(DVec2::new(sx, sy)) * self.0;
    }

    /// Rotate counter-clockwise by `theta` radians about the origin.
    pub fn rotate(&mut self, theta: f64) {
        self.0 = DAffine2::from_angle(theta) * self.0;
    }

    /// Compose with `other`: the result applies `other` first, then `self`.
    pub fn concat(&self, other: &Mx) -> Mx {
        Mx(self.0 * other.0)
    }

    pub fn determinant(&self) -> f64 {
        self.0.matrix2.determinant()
    }

    /// Whether the transform can be inverted without producing garbage.
    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();
        det.is_finite() && det.abs() > SINGULAR_EPSILON && self.0.translation.is_finite()
    }

    /// The inverse transform, or `None` for singular or non-finite matrices
    /// (e.g. a zero-width block mid-drag).
    pub fn inverse(&self) -> Option<Mx> {
        if !self.is_invertible() {
            return None;
        }
        Some(Mx(self.0.inverse()))
    }

    /// Map a local point into parent space.
    pub fn apply(&self, x: f64, y: f64) -> DVec2 {
        self.0.transform_point2(DVec2::new(x, y))
    }

    pub fn translation(&self) -> DVec2 {
        self.0.translation
    }

    /// Center, half extents and angle, read purely from where the transform
    /// sends `(0,0)`, `(0.5,0)` and `(0,0.5)`.
    ///
    /// Only meaningful when the basis vectors are orthogonal; see
    /// [`Mx::is_orthogonal`].
    pub fn geometry(&self) -> BoxGeometry {
        let center = self.apply(0.0, 0.0);
        let right = self.apply(0.5, 0.0) - center;
        let up = self.apply(0.0, 0.5) - center;
        BoxGeometry {
            center,
            half_width: right.length(),
            half_height: up.length(),
            angle: right.y.atan2(right.x),
        }
    }

    /// True when the local axes stay perpendicular (scale + rotation only).
    pub fn is_orthogonal(&self, tolerance: f64) -> bool {
        let x = self.0.matrix2.x_axis;
        let y = self.0.matrix2.y_axis;
        let scale = x.length() * y.length();
        if scale <= SINGULAR_EPSILON {
            return false;
        }
        (x.dot(y) / scale).abs() <= tolerance
    }

    /// All six elements are finite.
    pub fn is_finite(&self) -> bool {
        self.elements().iter().all(|v| v.is_finite())
    }

    /// 48-byte big-endian encoding of the six elements.
    pub fn to_bytes(&self) -> [u8; 48] {
        let mut out = [0u8; 48];
        for (i, v) in self.elements().iter().enumerate() {
            out[i * 8..(i + 1) * 8].copy_from_slice(&v.to_bits().to_be_bytes());
        }
        out
    }

    pub fn from_bytes(bytes: &[u8; 48]) -> Self {
        let mut e = [0.0; 6];
        for (i, v) in e.iter_mut().enumerate() {
            let mut word = [0u8; 8];
            word.copy_from_slice(&bytes[i * 8..(i + 1) * 8]);
            *v = f64::from_bits(u64::from_be_bytes(word));
        }
        Mx::from_elements(e)
    }
}

impl Default for Mx {
    fn default() -> Self {
        Mx::IDENTITY
    }
}

impl Serialize for Mx {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.elements().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Mx {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let e = <[f64; 6]>::deserialize(deserializer)?;
        Ok(Mx::from_elements(e))
    }
}
