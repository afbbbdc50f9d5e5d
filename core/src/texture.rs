use crate::scale8to5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub red: f32,
	pub green: f32,
	pub blue: f32,
	pub alpha: f32,
}

impl Color {
	pub const WHITE: Color = Color {
		red: 1.0,
		green: 1.0,
		blue: 1.0,
		alpha: 1.0,
	};

	pub fn from_rgb888(rgb: [u8; 3]) -> Color {
		Color {
			red: rgb[0] as f32 / 255.0,
			green: rgb[1] as f32 / 255.0,
			blue: rgb[2] as f32 / 255.0,
			alpha: 1.0,
		}
	}

	pub fn to_rgb888(&self) -> [u8; 3] {
		[to_u8(self.red), to_u8(self.green), to_u8(self.blue)]
	}

	/// Packs the color as a Saturn 15-bit direct color, with the MSB set
	pub fn to_rgb555(&self) -> u16 {
		rgb555(self.to_rgb888())
	}
}

/// Packs an 8-bit RGB triple as `1bbbbbgggggrrrrr`
pub const fn rgb555(rgb: [u8; 3]) -> u16 {
	0x8000 | (scale8to5(rgb[2]) as u16) << 10 | (scale8to5(rgb[1]) as u16) << 5 |
		scale8to5(rgb[0]) as u16
}

fn to_u8(channel: f32) -> u8 {
	(channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_rgb555() {
		assert_eq!(0x801F, rgb555([0xFF, 0, 0]));
		assert_eq!(0x83E0, rgb555([0, 0xFF, 0]));
		assert_eq!(0xFC00, rgb555([0, 0, 0xFF]));
		assert_eq!(0x8000, rgb555([0, 0, 0]));
		assert_eq!(0xFFFF, Color::WHITE.to_rgb555());
	}

	#[test]
	fn test_rgb888() {
		for rgb in [[0, 0, 0], [0xFF, 0x7F, 0x01], [12, 200, 255]] {
			assert_eq!(rgb, Color::from_rgb888(rgb).to_rgb888());
		}
	}
}
