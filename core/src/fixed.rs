use std::fmt;

/// Signed 16.16 fixed-point scalar, the geometry unit of the Saturn libraries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed(pub i32);

impl Fixed {
	pub const ZERO: Fixed = Fixed(0);
	pub const ONE: Fixed = Fixed(0x1_0000);

	/// Builds a whole-number value
	pub const fn from_int(i: i16) -> Fixed {
		Fixed((i as i32) << 16)
	}

	/// Converts a float, truncating toward zero. Out of range values saturate.
	pub fn from_f32(f: f32) -> Fixed {
		Fixed((f * 65536.0) as i32)
	}

	pub fn to_f32(self) -> f32 {
		self.0 as f32 / 65536.0
	}
}

impl From<i32> for Fixed {
	fn from(raw: i32) -> Self {
		Fixed(raw)
	}
}

impl fmt::Display for Fixed {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_f32())
	}
}

#[cfg(test)]
mod tests {
	use super::Fixed;

	#[test]
	fn test_conversions() {
		assert_eq!(Fixed::from_int(1), Fixed::ONE);
		assert_eq!(Fixed::from_int(-2).0, -0x2_0000);
		assert_eq!(Fixed::from_f32(0.5).0, 0x8000);
		assert_eq!(Fixed::from_f32(-1.5).to_f32(), -1.5);
		// truncation, not rounding
		assert_eq!(Fixed::from_f32(1.0 / 131072.0 * 1.5).0, 0);
		assert_eq!(Fixed::from_f32(1.0e9).0, i32::MAX);
	}

	#[test]
	fn test_display() {
		assert_eq!(Fixed(0x1_8000).to_string(), "1.5");
	}
}
