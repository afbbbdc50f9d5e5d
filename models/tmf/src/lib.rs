//! Tank Model Format (TMF) support.
//!
//! TMF files hold a shared texture table followed by any number of static
//! quad meshes, stored big-endian with 16.16 fixed-point coordinates.

pub mod engine;
pub mod loader;
pub mod report;
pub mod tmf;

#[cfg(feature = "import")]
pub mod attribute;
#[cfg(feature = "export")]
pub mod export;
#[cfg(feature = "import")]
pub mod mesh;

use bitflags::bitflags;

#[cfg(feature = "import")]
use log::debug;
#[cfg(feature = "export")]
use log::info;

use std::fs;
#[cfg(feature = "import")]
use std::path::Path;

use tmfkit_core::scene::Scene;

use engine::COLOR_TRANSPARENT;

#[cfg(feature = "export")]
use export::TmfExportError;

#[cfg(feature = "import")]
use engine::Mesh;

#[cfg(feature = "import")]
use loader::{
	BasicTextureLoader,
	SpriteStore,
	TextureLoader,
	TextureTable
};

#[cfg(feature = "export")]
use report::Report;

#[cfg(feature = "import")]
use tmf::import::TmfImportError;

use tmf::Tmf;

bitflags! {
	pub struct ImportFlag: u32 {
		/// Reject faces whose vertex indices fall outside their model
		const CHECK_VERTEX_INDICES = 1;
		/// Reject non-zero reserved bytes and face flag bits instead of ignoring them
		const STRICT_RESERVED = 2;
		/// Reject data after the last model
		const REJECT_TRAILING = 4;
	}
}

impl Default for ImportFlag {
	fn default() -> Self {
		ImportFlag::CHECK_VERTEX_INDICES
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportCfg {
	pub flags: ImportFlag,
	/// Transparent color key handed to the sprite store
	pub transparent_color: u16,
}

impl Default for ImportCfg {
	fn default() -> Self {
		Self {
			flags: ImportFlag::default(),
			transparent_color: COLOR_TRANSPARENT,
		}
	}
}

/// Loads `dir/file`, registering its textures with `store`
#[cfg(feature = "import")]
pub fn load_mesh<S>(file: &str, dir: &Path, store: &mut S, cfg: &ImportCfg) -> Result<Vec<Mesh>, TmfImportError>
where
	S: SpriteStore,
{
	let mut loader = BasicTextureLoader::new(store, cfg.transparent_color);
	load_mesh_with(file, dir, &mut loader, cfg)
}

/// Loads `dir/file`, registering its textures through `loader`
#[cfg(feature = "import")]
pub fn load_mesh_with<L>(file: &str, dir: &Path, loader: &mut L, cfg: &ImportCfg) -> Result<Vec<Mesh>, TmfImportError>
where
	L: TextureLoader + ?Sized,
{
	let data = fs::read(dir.join(file))?;
	load_mesh_from_bytes(data, dir, loader, cfg)
}

/// Builds engine meshes from a whole file held in memory.
///
/// The file is fully decoded before `loader` runs, so a malformed file never
/// registers any texture. `data` is released before the meshes are built.
#[cfg(feature = "import")]
pub fn load_mesh_from_bytes<L>(data: Vec<u8>, dir: &Path, loader: &mut L, cfg: &ImportCfg)
	-> Result<Vec<Mesh>, TmfImportError>
where
	L: TextureLoader + ?Sized,
{
	let tmf = Tmf::read(&data, cfg)?;
	drop(data);

	let first = loader.load(&tmf.textures, dir)?;
	debug!("First texture index: {:?}", first);

	let table = TextureTable::new(&tmf.textures, first);
	mesh::materialize(&tmf, &table, cfg)
}

/// Reads a file into the intermediate scene
#[cfg(feature = "import")]
pub fn read(filepath: &str, cfg: &ImportCfg) -> Result<Scene, TmfImportError> {
	let data = fs::read(filepath)?;
	let tmf = Tmf::read(&data, cfg)?;

	Ok(tmf.to_scene(filepath))
}

/// Writes a scene to a file and returns a summary of what was written
#[cfg(feature = "export")]
pub fn write(scene: &Scene, filepath: &str) -> Result<Report, TmfExportError> {
	let tmf = Tmf::from_scene(scene)?;
	fs::write(filepath, tmf.to_bytes()?)?;

	let report = tmf.report();
	info!("Wrote {}\n{}", filepath, report);

	Ok(report)
}
