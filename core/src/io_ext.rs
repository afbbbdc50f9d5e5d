use byteorder::{
	BE,
	ReadBytesExt,
	WriteBytesExt
};

use std::io::{
	Read,
	Result,
	Write
};

use crate::fixed::Fixed;

pub trait ReadBinExt: Read {
	/// Reads exactly `n` bytes
	#[inline]
	fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
		let mut buf = vec![0; n];
		self.read_exact(&mut buf)?;

		Ok(buf)
	}

	/// Reads a fixed-size byte array
	#[inline]
	fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let mut buf = [0; N];
		self.read_exact(&mut buf)?;

		Ok(buf)
	}

	/// Reads a NUL-padded text field occupying exactly `n` bytes.
	/// Each byte before the first NUL becomes one `char`.
	#[inline]
	fn read_ascii_field(&mut self, n: usize) -> Result<String> {
		let buf = self.read_bytes(n)?;

		Ok(buf.iter().take_while(|b| **b != 0).map(|b| *b as char).collect())
	}

	/// Reads a big endian 16.16 fixed-point scalar
	#[inline]
	fn read_fixed_be(&mut self) -> Result<Fixed> {
		Ok(Fixed(self.read_i32::<BE>()?))
	}

	/// Reads three big endian fixed-point scalars (X, Y, Z)
	#[inline]
	fn read_fixed3_be(&mut self) -> Result<[Fixed; 3]> {
		Ok([self.read_fixed_be()?, self.read_fixed_be()?, self.read_fixed_be()?])
	}
}

impl<R> ReadBinExt for R
where
	R: Read + ?Sized,
{
}

pub trait WriteBinExt: Write {
	/// Writes `s` as a NUL-padded field of exactly `n` bytes, truncating if needed.
	/// Characters above U+00FF are written as `?`.
	#[inline]
	fn write_ascii_field(&mut self, s: &str, n: usize) -> Result<()> {
		let mut buf = vec![0; n];

		for (dst, c) in buf.iter_mut().zip(s.chars()) {
			*dst = u8::try_from(c).unwrap_or(b'?');
		}

		self.write_all(&buf)
	}

	#[inline]
	fn write_fixed_be(&mut self, f: Fixed) -> Result<()> {
		self.write_i32::<BE>(f.0)
	}

	#[inline]
	fn write_fixed3_be(&mut self, v: &[Fixed; 3]) -> Result<()> {
		for f in v.iter() {
			self.write_fixed_be(*f)?;
		}

		Ok(())
	}
}

impl<W> WriteBinExt for W
where
	W: Write + ?Sized,
{
}

#[cfg(test)]
mod tests {
	use std::io::{
		Cursor,
		ErrorKind
	};

	use super::*;

	#[test]
	fn test_read_ascii_field() {
		let mut data = &b"TEX.TGA\x00\x00\x00\x00\x00\x00\xFF\x00\x00"[..];
		assert_eq!("TEX.TGA".to_string(), data.read_ascii_field(13).unwrap());
		assert_eq!(data, &[0xFF, 0, 0][..]);

		let mut empty = &[0u8; 13][..];
		assert_eq!("", empty.read_ascii_field(13).unwrap());
	}

	#[test]
	fn test_read_fixed() {
		let mut data = &[0x00, 0x01, 0x00, 0x00, 0xFF, 0xFF, 0x80, 0x00, 0, 0, 0, 0][..];
		assert_eq!([Fixed::ONE, Fixed(-0x8000), Fixed::ZERO], data.read_fixed3_be().unwrap());
	}

	#[test]
	fn test_read_advances_position() {
		let mut cur = Cursor::new(&[1u8, 2, 3, 4, 5][..]);
		assert_eq!(vec![1, 2], cur.read_bytes(2).unwrap());
		assert_eq!(2, cur.position());
		assert_eq!([3, 4], cur.read_array::<2>().unwrap());
		assert_eq!(4, cur.position());
	}

	#[test]
	fn test_read_past_end() {
		let mut data = &[0u8; 3][..];
		let err = data.read_fixed_be().unwrap_err();
		assert_eq!(ErrorKind::UnexpectedEof, err.kind());

		let mut data = &[0u8; 12][..];
		assert_eq!(ErrorKind::UnexpectedEof, data.read_bytes(13).unwrap_err().kind());
	}

	#[test]
	fn test_write_ascii_field() {
		let mut out = vec![];
		out.write_ascii_field("A.TGA", 8).unwrap();
		assert_eq!(b"A.TGA\x00\x00\x00".to_vec(), out);

		let mut out = vec![];
		out.write_ascii_field("VERY_LONG_NAME.TGA", 13).unwrap();
		assert_eq!(b"VERY_LONG_NAM".to_vec(), out);
	}

	#[test]
	fn test_write_fixed3() {
		let mut out = vec![];
		out.write_fixed3_be(&[Fixed::ONE, Fixed(-1), Fixed::ZERO]).unwrap();
		assert_eq!(vec![0, 1, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0], out);
		assert_eq!([Fixed::ONE, Fixed(-1), Fixed::ZERO], out.as_slice().read_fixed3_be().unwrap());
	}
}
