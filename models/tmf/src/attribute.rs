use tmfkit_core::texture::rgb555;

use crate::{
	engine::{
		Attribute,
		DrawMode,
		NO_OPTION,
		NO_PALET,
		NO_TEXTURE,
		Plane,
		Sort,
		Sprite
	},
	loader::TextureTable,
	tmf::{
		Face,
		FaceFlags,
		TextureEntry,
		import::TmfImportError
	}
};

/// Builds the render attributes of `face`, whose texture slot is `texture`.
///
/// Color slots give a flat polygon in the slot's color; named slots give a textured
/// sprite with the engine index from `table`.
pub fn synthesize(face: &Face, texture: &TextureEntry, table: &TextureTable) -> Result<Attribute, TmfImportError> {
	let (texture_id, color, sprite) = if texture.is_color_only() {
		(NO_TEXTURE, rgb555(texture.color), Sprite::Polygon)
	} else {
		let id = table.get(face.texture).ok_or(TmfImportError::UnmappedTexture(face.texture))?;
		(id, NO_PALET, Sprite::NoFlip)
	};

	let plane = if face.flags.contains(FaceFlags::DOUBLE) {
		Plane::Dual
	} else {
		Plane::Single
	};

	let mesh = if face.flags.contains(FaceFlags::MESHED) {
		DrawMode::MESH_ON
	} else {
		DrawMode::MESH_OFF
	};

	Ok(Attribute {
		plane: plane,
		sort: Sort::Center,
		texture: texture_id,
		color: color,
		gouraud: DrawMode::CL32KRGB | DrawMode::NO_GOURAUD,
		mode: DrawMode::CL32KRGB | mesh,
		sprite: sprite,
		option: NO_OPTION,
	})
}

#[cfg(test)]
mod tests {
	use tmfkit_core::fixed::Fixed;

	use super::*;

	fn face(flags: FaceFlags, texture: u8) -> Face {
		Face {
			normal: [Fixed::ZERO, Fixed::ZERO, Fixed::ONE],
			indices: [0, 1, 2, 3],
			flags: flags,
			texture: texture,
		}
	}

	#[test]
	fn test_color_slot() {
		let slots = vec![TextureEntry::color([0xFF, 0, 0])];
		let table = TextureTable::new(&slots, None);

		let attr = synthesize(&face(FaceFlags::empty(), 0), &slots[0], &table).unwrap();
		assert_eq!(NO_TEXTURE, attr.texture);
		assert_eq!(rgb555([0xFF, 0, 0]), attr.color);
		assert_eq!(Plane::Single, attr.plane);
		assert_eq!(Sort::Center, attr.sort);
		assert_eq!(Sprite::Polygon, attr.sprite);
		assert!(!attr.mode.contains(DrawMode::MESH_ON));
		assert!(attr.mode.contains(DrawMode::CL32KRGB));
		assert_eq!(DrawMode::CL32KRGB, attr.gouraud);
		assert_eq!(NO_OPTION, attr.option);
	}

	#[test]
	fn test_texture_slot() {
		let slots = vec![TextureEntry::texture("TEX.TGA")];
		let table = TextureTable::new(&slots, Some(7));

		let attr = synthesize(&face(FaceFlags::DOUBLE | FaceFlags::MESHED, 0), &slots[0], &table).unwrap();
		assert_eq!(7, attr.texture);
		assert_eq!(NO_PALET, attr.color);
		assert_eq!(Plane::Dual, attr.plane);
		assert_eq!(Sprite::NoFlip, attr.sprite);
		assert_eq!(DrawMode::CL32KRGB | DrawMode::MESH_ON, attr.mode);
	}

	#[test]
	fn test_texture_offset() {
		let slots = vec![TextureEntry::texture("A.TGA"), TextureEntry::texture("B.TGA")];
		let table = TextureTable::new(&slots, Some(10));

		let attr = synthesize(&face(FaceFlags::empty(), 1), &slots[1], &table).unwrap();
		assert_eq!(11, attr.texture);
	}

	#[test]
	fn test_unmapped_texture() {
		let slots = vec![TextureEntry::texture("A.TGA")];
		let table = TextureTable::new(&slots, None);

		match synthesize(&face(FaceFlags::empty(), 0), &slots[0], &table) {
			Err(TmfImportError::UnmappedTexture(0)) => {},
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn test_color_texture_exclusive() {
		let slots = vec![
			TextureEntry::texture("A.TGA"),
			TextureEntry::color([0, 0, 0]),
			TextureEntry::color([0xFF, 0xFF, 0xFF]),
		];
		let table = TextureTable::new(&slots, Some(0));

		for (i, slot) in slots.iter().enumerate() {
			for flags in 0..=3 {
				let f = face(FaceFlags::from_bits_truncate(flags), i as u8);
				let attr = synthesize(&f, slot, &table).unwrap();
				assert!((attr.texture != NO_TEXTURE) != (attr.color != NO_PALET));
			}
		}
	}
}
