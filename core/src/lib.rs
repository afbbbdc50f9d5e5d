pub mod fixed;

#[cfg(feature = "io_ext")]
pub mod io_ext;

pub mod scene;
pub mod texture;

/// Scales an 8 bit value to 5 bits
pub const fn scale8to5(b: u8) -> u8 {
	(b & 0xF8) >> 3
}

#[cfg(test)]
mod tests {
	#[test]
	fn test_scale() {
		assert_eq!(super::scale8to5(0xFF), 0x1F);
		assert_eq!(super::scale8to5(0x07), 0);
		assert_eq!(super::scale8to5(0x80), 0x10);
	}
}
