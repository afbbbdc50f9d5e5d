use log::trace;

use std::{
	fs,
	io,
	path::{
		Path,
		PathBuf
	}
};

use thiserror::Error;

use crate::{
	engine::NO_TEXTURE,
	tmf::TextureEntry
};

#[derive(Debug, Error)]
pub enum TextureLoadError {
	#[error("Unable to read texture {path:?}")]
	IO {
		path: PathBuf,
		source: io::Error,
	},
	#[error("Sprite store is full: {0} sprites")]
	StoreFull(usize),
	#[error("{0}")]
	Other(String),
}

/// Registers a file's texture table with the engine.
///
/// Called once per load, before any face attribute is built, with every slot in
/// file order. Returns the engine index of the first registered texture, or `None`
/// if no slot named a file. Slot `k` is then expected at `first + k`.
pub trait TextureLoader {
	fn load(&mut self, textures: &[TextureEntry], dir: &Path) -> Result<Option<u16>, TextureLoadError>;
}

impl<F> TextureLoader for F
where
	F: FnMut(&[TextureEntry], &Path) -> Result<Option<u16>, TextureLoadError>,
{
	fn load(&mut self, textures: &[TextureEntry], dir: &Path) -> Result<Option<u16>, TextureLoadError> {
		self(textures, dir)
	}
}

/// The engine's sprite storage
pub trait SpriteStore {
	/// Loads `dir/file_name` as a TGA sprite and returns its engine index
	fn add_tga(&mut self, dir: &Path, file_name: &str, transparent: u16) -> Result<u16, TextureLoadError>;
}

/// Loads every named slot, in order, through a [`SpriteStore`]
pub struct BasicTextureLoader<'a, S: SpriteStore> {
	store: &'a mut S,
	transparent: u16,
}

impl<'a, S: SpriteStore> BasicTextureLoader<'a, S> {
	pub fn new(store: &'a mut S, transparent: u16) -> Self {
		BasicTextureLoader {
			store: store,
			transparent: transparent,
		}
	}
}

impl<'a, S: SpriteStore> TextureLoader for BasicTextureLoader<'a, S> {
	fn load(&mut self, textures: &[TextureEntry], dir: &Path) -> Result<Option<u16>, TextureLoadError> {
		let mut first = None;

		for tex in textures.iter().filter(|t| !t.is_color_only()) {
			let index = self.store.add_tga(dir, &tex.file_name, self.transparent)?;
			trace!("Registered {} as sprite {}", tex.file_name, index);
			first.get_or_insert(index);
		}

		Ok(first)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
	pub name: String,
	pub transparent: u16,
	/// Undecoded file contents
	pub data: Vec<u8>,
}

/// An in-memory [`SpriteStore`] that keeps raw image files
#[derive(Clone, Debug, Default)]
pub struct SpriteTable {
	pub sprites: Vec<Sprite>,
}

impl SpriteTable {
	pub fn new() -> Self {
		SpriteTable::default()
	}
}

impl SpriteStore for SpriteTable {
	fn add_tga(&mut self, dir: &Path, file_name: &str, transparent: u16) -> Result<u16, TextureLoadError> {
		let index = u16::try_from(self.sprites.len())
			.ok()
			.filter(|i| *i != NO_TEXTURE)
			.ok_or(TextureLoadError::StoreFull(self.sprites.len()))?;

		let path = dir.join(file_name);
		let data = fs::read(&path).map_err(|e| TextureLoadError::IO {
			path: path,
			source: e,
		})?;

		self.sprites.push(Sprite {
			name: file_name.to_string(),
			transparent: transparent,
			data: data,
		});

		Ok(index)
	}
}

/// Engine texture index for each texture table slot
#[derive(Clone, Debug, PartialEq)]
pub struct TextureTable {
	ids: Vec<Option<u16>>,
}

impl TextureTable {
	/// Maps slot `k` to `first + k` for every named slot; color slots map to nothing
	pub fn new(textures: &[TextureEntry], first: Option<u16>) -> TextureTable {
		TextureTable {
			ids: textures.iter().enumerate().map(|(k, tex)| {
				if tex.is_color_only() {
					return None;
				}

				first.and_then(|base| u16::try_from(k).ok()?.checked_add(base))
					.filter(|id| *id != NO_TEXTURE)
			}).collect(),
		}
	}

	pub fn get(&self, slot: u8) -> Option<u16> {
		self.ids.get(slot as usize).copied().flatten()
	}

	pub fn len(&self) -> usize {
		self.ids.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use std::path::{
		Path,
		PathBuf
	};

	use super::*;

	/// Hands out consecutive indices starting at `next`, recording each call
	struct Recorder {
		next: u16,
		calls: Vec<(PathBuf, String, u16)>,
	}

	impl SpriteStore for Recorder {
		fn add_tga(&mut self, dir: &Path, file_name: &str, transparent: u16) -> Result<u16, TextureLoadError> {
			self.calls.push((dir.to_path_buf(), file_name.to_string(), transparent));
			self.next += 1;
			Ok(self.next - 1)
		}
	}

	#[test]
	fn test_basic_loader_order() {
		let textures = vec![
			TextureEntry::texture("A.TGA"),
			TextureEntry::texture("B.TGA"),
			TextureEntry::color([1, 2, 3]),
		];
		let mut store = Recorder {
			next: 7,
			calls: vec![],
		};

		let first = BasicTextureLoader::new(&mut store, 0x1234).load(&textures, Path::new("MODELS")).unwrap();
		assert_eq!(Some(7), first);
		assert_eq!(vec![
			(PathBuf::from("MODELS"), "A.TGA".to_string(), 0x1234),
			(PathBuf::from("MODELS"), "B.TGA".to_string(), 0x1234),
		], store.calls);
	}

	#[test]
	fn test_basic_loader_colors_only() {
		let textures = vec![TextureEntry::color([0xFF, 0, 0])];
		let mut store = Recorder {
			next: 0,
			calls: vec![],
		};

		let first = BasicTextureLoader::new(&mut store, 0).load(&textures, Path::new(".")).unwrap();
		assert_eq!(None, first);
		assert!(store.calls.is_empty());
	}

	#[test]
	fn test_closure_loader() {
		let mut calls = 0;
		let mut loader = |textures: &[TextureEntry], _: &Path| -> Result<Option<u16>, TextureLoadError> {
			calls += 1;
			Ok(Some(textures.len() as u16))
		};

		assert_eq!(Some(2), loader.load(&[TextureEntry::texture("A"), TextureEntry::texture("B")],
			Path::new(".")).unwrap());
		assert_eq!(1, calls);
	}

	#[test]
	fn test_texture_table() {
		let textures = vec![
			TextureEntry::texture("A.TGA"),
			TextureEntry::texture("B.TGA"),
			TextureEntry::color([0, 0, 0]),
		];

		let table = TextureTable::new(&textures, Some(3));
		assert_eq!(Some(3), table.get(0));
		assert_eq!(Some(4), table.get(1));
		assert_eq!(None, table.get(2));
		assert_eq!(None, table.get(3));

		let table = TextureTable::new(&textures, None);
		assert_eq!(None, table.get(0));

		let table = TextureTable::new(&textures, Some(0xFFFE));
		assert_eq!(Some(0xFFFE), table.get(0));
		assert_eq!(None, table.get(1));
	}

	#[test]
	fn test_sprite_table() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join("TEX.TGA"), b"not really a tga").unwrap();

		let mut table = SpriteTable::new();
		assert_eq!(0, table.add_tga(dir.path(), "TEX.TGA", 0).unwrap());
		assert_eq!(1, table.add_tga(dir.path(), "TEX.TGA", 0).unwrap());
		assert_eq!(b"not really a tga".to_vec(), table.sprites[1].data);

		match table.add_tga(dir.path(), "MISSING.TGA", 0) {
			Err(TextureLoadError::IO { path, .. }) => assert!(path.ends_with("MISSING.TGA")),
			other => panic!("unexpected result: {:?}", other),
		}
	}
}
