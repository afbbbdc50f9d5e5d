use bitflags::bitflags;

use byteorder::{
	BE,
	ReadBytesExt,
	WriteBytesExt
};

#[cfg(feature = "import")]
use log::{
	debug,
	warn
};

#[cfg(feature = "import")]
use std::io::Cursor;

use ultraviolet::vec::Vec3;

use tmfkit_core::{
	fixed::Fixed,
	io_ext::{
		ReadBinExt,
		WriteBinExt
	},
	scene::{
		self,
		Material,
		Mesh,
		Node,
		NodeData,
		ObjRef,
		Scene,
		Surface
	},
	texture::Color
};

#[cfg(feature = "export")]
use crate::export::TmfExportError;

#[cfg(feature = "import")]
use crate::{
	ImportCfg,
	ImportFlag
};

#[cfg(feature = "import")]
use import::TmfImportError;

pub const HEADER_SIZE: usize = 8;
pub const TEXTURE_ENTRY_SIZE: usize = 16;
pub const MODEL_HEADER_SIZE: usize = 4;
pub const VERTEX_SIZE: usize = 12;
pub const FACE_SIZE: usize = 24;
pub const FILE_NAME_SIZE: usize = 13;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum ModelType {
	Static = 0,
}

impl ModelType {
	#[cfg(feature = "import")]
	fn read<R>(buf: &mut R) -> Result<ModelType, TmfImportError>
	where
		R: ReadBytesExt,
	{
		match buf.read_u8()? {
			0 => Ok(ModelType::Static),
			kind => Err(TmfImportError::UnsupportedType(kind)),
		}
	}
}

bitflags! {
	/// Face flags. Bits 2-7 are reserved.
	pub struct FaceFlags: u8 {
		const DOUBLE = 0x01;
		const MESHED = 0x02;
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Header {
	pub kind: ModelType,
	pub num_textures: u8,
	pub num_models: u8,
}

impl Header {
	#[cfg(feature = "import")]
	fn read<R>(buf: &mut R, cfg: &ImportCfg) -> Result<Header, TmfImportError>
	where
		R: ReadBytesExt,
	{
		let kind = ModelType::read(buf)?;
		let num_textures = buf.read_u8()?;
		let num_models = buf.read_u8()?;
		check_reserved(&buf.read_array::<5>()?, "file header", cfg)?;

		Ok(Header {
			kind: kind,
			num_textures: num_textures,
			num_models: num_models,
		})
	}

	#[cfg(feature = "export")]
	fn write<W>(&self, buf: &mut W) -> Result<(), TmfExportError>
	where
		W: WriteBytesExt,
	{
		buf.write_u8(self.kind as u8)?;
		buf.write_u8(self.num_textures)?;
		buf.write_u8(self.num_models)?;
		buf.write_all(&[0; 5])?;

		Ok(())
	}
}

/// Texture table slot: either a texture file or, when the name is empty, a flat color
#[derive(Clone, Debug, PartialEq)]
pub struct TextureEntry {
	pub file_name: String,
	pub color: [u8; 3],
}

impl TextureEntry {
	/// A texture file slot. The color is unused by the loader but exported as white.
	pub fn texture(file_name: &str) -> TextureEntry {
		TextureEntry {
			file_name: file_name.to_string(),
			color: [0xFF; 3],
		}
	}

	pub fn color(rgb: [u8; 3]) -> TextureEntry {
		TextureEntry {
			file_name: String::new(),
			color: rgb,
		}
	}

	/// True when the slot has no file name and faces using it are flat shaded
	pub fn is_color_only(&self) -> bool {
		self.file_name.is_empty()
	}

	#[cfg(feature = "import")]
	fn read<R>(buf: &mut R) -> Result<TextureEntry, TmfImportError>
	where
		R: ReadBytesExt,
	{
		let file_name = buf.read_ascii_field(FILE_NAME_SIZE)?;
		if !file_name.is_ascii() {
			warn!("Texture name {:?} is not ASCII", file_name);
		}

		Ok(TextureEntry {
			file_name: file_name,
			color: buf.read_array::<3>()?,
		})
	}

	#[cfg(feature = "export")]
	fn write<W>(&self, buf: &mut W) -> Result<(), TmfExportError>
	where
		W: WriteBytesExt,
	{
		buf.write_ascii_field(&self.file_name, FILE_NAME_SIZE)?;
		buf.write_all(&self.color)?;

		Ok(())
	}
}

/// X, Y, Z
pub type Vertex = [Fixed; 3];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelHeader {
	pub num_vertices: u16,
	pub num_faces: u16,
}

impl ModelHeader {
	#[cfg(feature = "import")]
	fn read<R>(buf: &mut R) -> Result<ModelHeader, TmfImportError>
	where
		R: ReadBytesExt,
	{
		Ok(ModelHeader {
			num_vertices: buf.read_u16::<BE>()?,
			num_faces: buf.read_u16::<BE>()?,
		})
	}

	#[cfg(feature = "export")]
	fn write<W>(&self, buf: &mut W) -> Result<(), TmfExportError>
	where
		W: WriteBytesExt,
	{
		buf.write_u16::<BE>(self.num_vertices)?;
		buf.write_u16::<BE>(self.num_faces)?;

		Ok(())
	}
}

/// A quad
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Face {
	pub normal: [Fixed; 3],
	pub indices: [u16; 4],
	pub flags: FaceFlags,
	/// Index into the file's texture table
	pub texture: u8,
}

impl Face {
	#[cfg(feature = "import")]
	fn read<R>(buf: &mut R, cfg: &ImportCfg) -> Result<Face, TmfImportError>
	where
		R: ReadBytesExt,
	{
		let normal = buf.read_fixed3_be()?;

		let mut indices = [0; 4];
		for idx in indices.iter_mut() {
			*idx = buf.read_u16::<BE>()?;
		}

		let flags = buf.read_u8()?;
		check_reserved(&[flags & !FaceFlags::all().bits()], "face flags", cfg)?;

		let texture = buf.read_u8()?;
		check_reserved(&buf.read_array::<2>()?, "face", cfg)?;

		Ok(Face {
			normal: normal,
			indices: indices,
			flags: FaceFlags::from_bits_truncate(flags),
			texture: texture,
		})
	}

	#[cfg(feature = "export")]
	fn write<W>(&self, buf: &mut W) -> Result<(), TmfExportError>
	where
		W: WriteBytesExt,
	{
		buf.write_fixed3_be(&self.normal)?;
		for idx in self.indices.iter() {
			buf.write_u16::<BE>(*idx)?;
		}
		buf.write_u8(self.flags.bits())?;
		buf.write_u8(self.texture)?;
		buf.write_all(&[0; 2])?;

		Ok(())
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
	pub vertices: Vec<Vertex>,
	pub faces: Vec<Face>,
}

impl Model {
	#[cfg(feature = "import")]
	fn read<R>(buf: &mut R, cfg: &ImportCfg) -> Result<Model, TmfImportError>
	where
		R: ReadBytesExt,
	{
		let header = ModelHeader::read(buf)?;

		let mut vertices = Vec::with_capacity(header.num_vertices as usize);
		for _ in 0..header.num_vertices {
			vertices.push(buf.read_fixed3_be()?);
		}

		let mut faces = Vec::with_capacity(header.num_faces as usize);
		for _ in 0..header.num_faces {
			faces.push(Face::read(buf, cfg)?);
		}

		Ok(Model {
			vertices: vertices,
			faces: faces,
		})
	}

	#[cfg(feature = "export")]
	fn write<W>(&self, buf: &mut W) -> Result<(), TmfExportError>
	where
		W: WriteBytesExt,
	{
		let header = ModelHeader {
			num_vertices: u16::try_from(self.vertices.len())
				.map_err(|_| TmfExportError::TooManyVertices(self.vertices.len()))?,
			num_faces: u16::try_from(self.faces.len())
				.map_err(|_| TmfExportError::TooManyFaces(self.faces.len()))?,
		};
		header.write(buf)?;

		for v in self.vertices.iter() {
			buf.write_fixed3_be(v)?;
		}

		for face in self.faces.iter() {
			face.write(buf)?;
		}

		Ok(())
	}
}

/// A decoded Tank Model Format file
#[derive(Clone, Debug, PartialEq)]
pub struct Tmf {
	pub kind: ModelType,
	/// Shared by every model in the file
	pub textures: Vec<TextureEntry>,
	pub models: Vec<Model>,
}

impl Tmf {
	pub fn new() -> Tmf {
		Tmf {
			kind: ModelType::Static,
			textures: vec![],
			models: vec![],
		}
	}

	/// Decodes a file from a byte reader, consuming exactly the bytes the counts call for
	#[cfg(feature = "import")]
	pub fn read_from<R>(buf: &mut R, cfg: &ImportCfg) -> Result<Tmf, TmfImportError>
	where
		R: ReadBytesExt,
	{
		let header = Header::read(buf, cfg)?;
		debug!("TMF header: {} texture(s), {} model(s)", header.num_textures, header.num_models);

		let mut textures = Vec::with_capacity(header.num_textures as usize);
		for _ in 0..header.num_textures {
			textures.push(TextureEntry::read(buf)?);
		}

		let mut models = Vec::with_capacity(header.num_models as usize);
		for i in 0..header.num_models {
			let model = Model::read(buf, cfg)?;
			debug!("Model {}: {} vertices, {} faces", i, model.vertices.len(), model.faces.len());
			models.push(model);
		}

		Ok(Tmf {
			kind: header.kind,
			textures: textures,
			models: models,
		})
	}

	/// Decodes a whole file held in memory
	#[cfg(feature = "import")]
	pub fn read(data: &[u8], cfg: &ImportCfg) -> Result<Tmf, TmfImportError> {
		let mut cur = Cursor::new(data);
		let tmf = Tmf::read_from(&mut cur, cfg)?;

		let trailing = data.len() - cur.position() as usize;
		if trailing > 0 {
			if cfg.flags.contains(ImportFlag::REJECT_TRAILING) {
				return Err(TmfImportError::TrailingData(trailing));
			}
			warn!("Ignoring {} byte(s) after the last model", trailing);
		}

		Ok(tmf)
	}

	/// Size of the encoded file in bytes
	pub fn encoded_len(&self) -> usize {
		HEADER_SIZE + self.textures.len() * TEXTURE_ENTRY_SIZE + self.models.iter()
			.map(|m| MODEL_HEADER_SIZE + m.vertices.len() * VERTEX_SIZE + m.faces.len() * FACE_SIZE)
			.sum::<usize>()
	}

	#[cfg(feature = "export")]
	pub fn write<W>(&self, buf: &mut W) -> Result<(), TmfExportError>
	where
		W: WriteBytesExt,
	{
		let header = Header {
			kind: self.kind,
			num_textures: u8::try_from(self.textures.len())
				.map_err(|_| TmfExportError::TooManyTextures(self.textures.len()))?,
			num_models: u8::try_from(self.models.len())
				.map_err(|_| TmfExportError::TooManyModels(self.models.len()))?,
		};
		header.write(buf)?;

		for tex in self.textures.iter() {
			tex.write(buf)?;
		}

		for model in self.models.iter() {
			model.write(buf)?;
		}

		Ok(())
	}

	#[cfg(feature = "export")]
	pub fn to_bytes(&self) -> Result<Vec<u8>, TmfExportError> {
		let mut out = Vec::with_capacity(self.encoded_len());
		self.write(&mut out)?;

		Ok(out)
	}

	/// Converts to the intermediate scene: one child node per model, one material per texture slot
	pub fn to_scene(&self, name: &str) -> Scene {
		let mut root = Node::new(ObjRef::Name(name.to_string()));

		for (i, model) in self.models.iter().enumerate() {
			let mut mesh = Mesh::default();
			mesh.vertices = model.vertices.iter().map(|v| scene::Vertex::new(to_vec3(v))).collect();

			for face in model.faces.iter() {
				mesh.faces.push(scene::Face::Quad(face.indices.map(|idx| idx as usize)));
				mesh.surfaces.push(Surface {
					material: Some(face.texture as usize),
					normal: Some(to_vec3(&face.normal)),
					double_sided: face.flags.contains(FaceFlags::DOUBLE),
					meshed: face.flags.contains(FaceFlags::MESHED),
				});
			}

			let mut node = Node::new(ObjRef::Name(format!("model{}", i)));
			node.data = NodeData::Geometry(mesh);
			root.children.push(node);
		}

		let mut scene = Scene::new(root);
		scene.materials = self.textures.iter().enumerate().map(|(i, tex)| {
			let mut mat = Material::new(&format!("texture{}", i));
			mat.set_diffuse(Color::from_rgb888(tex.color));
			if !tex.is_color_only() {
				mat.set_diffuse_map(&tex.file_name);
			}
			mat
		}).collect();

		scene
	}
}

impl Default for Tmf {
	fn default() -> Self {
		Tmf::new()
	}
}

fn to_vec3(v: &[Fixed; 3]) -> Vec3 {
	Vec3::new(v[0].to_f32(), v[1].to_f32(), v[2].to_f32())
}

#[cfg(feature = "import")]
fn check_reserved(reserved: &[u8], what: &'static str, cfg: &ImportCfg) -> Result<(), TmfImportError> {
	if reserved.iter().all(|b| *b == 0) {
		return Ok(());
	}

	if cfg.flags.contains(ImportFlag::STRICT_RESERVED) {
		return Err(TmfImportError::Reserved(what));
	}

	warn!("Ignoring non-zero reserved bits in {}: {:02X?}", what, reserved);
	Ok(())
}

#[cfg(feature = "import")]
pub mod import {
	use std::{
		collections::TryReserveError,
		io
	};

	use thiserror::Error;

	use crate::loader::TextureLoadError;

	#[derive(Debug, Error)]
	pub enum TmfImportError {
		#[error("I/O error")]
		IO {
			source: io::Error,
		},
		#[error("Out of memory")]
		OutOfMemory {
			#[from]
			source: TryReserveError,
		},
		#[error("Non-zero reserved data in {0}")]
		Reserved(&'static str),
		#[error("Texture loading failed")]
		TextureLoad {
			#[from]
			source: TextureLoadError,
		},
		#[error("Texture index out of range: {index}/{count}")]
		TextureIndex {
			index: u8,
			count: usize,
		},
		#[error("Trailing data after the last model: {0} bytes")]
		TrailingData(usize),
		#[error("Unexpected end of data")]
		Truncated,
		#[error("Texture slot {0} has no engine index")]
		UnmappedTexture(u8),
		#[error("Unknown/unsupported model type: {0}")]
		UnsupportedType(u8),
		#[error("Vertex index out of range: {index}/{count}")]
		VertexIndex {
			index: u16,
			count: usize,
		},
	}

	impl From<io::Error> for TmfImportError {
		fn from(source: io::Error) -> Self {
			match source.kind() {
				io::ErrorKind::UnexpectedEof => TmfImportError::Truncated,
				_ => TmfImportError::IO {
					source: source,
				},
			}
		}
	}
}
