use log::info;

use std::{
	collections::HashMap,
	io
};

use thiserror::Error;

use ultraviolet::vec::Vec3;

use tmfkit_core::{
	fixed::Fixed,
	scene::{
		self,
		Material,
		Mesh,
		Scene
	}
};

use crate::tmf::{
	Face,
	FaceFlags,
	FILE_NAME_SIZE,
	Model,
	ModelType,
	TextureEntry,
	Tmf
};

#[derive(Debug, Error)]
pub enum TmfExportError {
	#[error("I/O error")]
	IO {
		#[from]
		source: io::Error,
	},
	#[error("Face references a missing material: {0}")]
	Material(usize),
	#[error("Faces need a material but the scene has none")]
	NoMaterials,
	#[error("File does not contain any models")]
	NoModels,
	#[error("All faces must be quads: face {0} has {1} corners")]
	NotQuad(usize, usize),
	#[error("Max number of faces in one model exceeded: {0}/65535")]
	TooManyFaces(usize),
	#[error("Max number of models in one file exceeded: {0}/255")]
	TooManyModels(usize),
	#[error("Max number of textures in one file exceeded: {0}/255")]
	TooManyTextures(usize),
	#[error("Max number of vertices in one model exceeded: {0}/65535")]
	TooManyVertices(usize),
	#[error("Vertex index out of range: {0}")]
	VertexIndex(usize),
}

impl Tmf {
	/// Builds a file from a scene, one model per geometry node
	pub fn from_scene(scene: &Scene) -> Result<Tmf, TmfExportError> {
		let nodes = scene.geometry_nodes();
		if nodes.is_empty() {
			return Err(TmfExportError::NoModels);
		} else if nodes.len() > u8::MAX as usize {
			return Err(TmfExportError::TooManyModels(nodes.len()));
		} else if scene.materials.len() > u8::MAX as usize {
			return Err(TmfExportError::TooManyTextures(scene.materials.len()));
		}

		// Textured materials go first so slot k is engine texture first + k
		let mut order: Vec<usize> = (0..scene.materials.len()).collect();
		order.sort_by_key(|i| scene.materials[*i].diffuse_map().is_none());

		let mut slots = vec![0; scene.materials.len()];
		for (slot, mat) in order.iter().enumerate() {
			slots[*mat] = slot as u8;
		}

		let mut models = Vec::with_capacity(nodes.len());
		for mesh in nodes.iter().filter_map(|n| n.mesh()) {
			models.push(model_entry(mesh, &slots)?);
		}

		let tmf = Tmf {
			kind: ModelType::Static,
			textures: order.iter().map(|i| texture_entry(&scene.materials[*i])).collect(),
			models: models,
		};

		info!("Built TMF with {} model(s) and {} texture slot(s)", tmf.models.len(), tmf.textures.len());
		Ok(tmf)
	}
}

fn texture_entry(mat: &Material) -> TextureEntry {
	match mat.diffuse_map() {
		Some(path) => {
			let file = path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path);
			TextureEntry::texture(&file.to_uppercase().chars().take(FILE_NAME_SIZE).collect::<String>())
		},
		None => TextureEntry::color(mat.diffuse().to_rgb888()),
	}
}

fn model_entry(mesh: &Mesh, slots: &[u8]) -> Result<Model, TmfExportError> {
	if mesh.faces.len() > u16::MAX as usize {
		return Err(TmfExportError::TooManyFaces(mesh.faces.len()));
	}

	// scene vertex index -> model vertex index, in first-use order
	let mut local: HashMap<usize, u16> = HashMap::new();
	let mut vertices = vec![];
	let mut faces = Vec::with_capacity(mesh.faces.len());

	for (i, face) in mesh.faces.iter().enumerate() {
		let corners = face.indices();
		if corners.is_empty() || corners.len() > 4 {
			return Err(TmfExportError::NotQuad(i, corners.len()));
		}

		// short polygons repeat their last corner
		let mut indices = [0; 4];
		for (k, dst) in indices.iter_mut().enumerate() {
			let src = corners[k.min(corners.len() - 1)];

			*dst = match local.get(&src) {
				Some(idx) => *idx,
				None => {
					let vertex = mesh.vertices.get(src).ok_or(TmfExportError::VertexIndex(src))?;
					if vertices.len() == u16::MAX as usize {
						return Err(TmfExportError::TooManyVertices(vertices.len() + 1));
					}

					let idx = vertices.len() as u16;
					local.insert(src, idx);
					vertices.push(to_fixed3(vertex.position));
					idx
				},
			};
		}

		let surface = mesh.surface(i);
		let texture = match surface.material {
			Some(m) => *slots.get(m).ok_or(TmfExportError::Material(m))?,
			None if slots.is_empty() => return Err(TmfExportError::NoMaterials),
			None => 0,
		};

		let mut flags = FaceFlags::empty();
		flags.set(FaceFlags::DOUBLE, surface.double_sided);
		flags.set(FaceFlags::MESHED, surface.meshed);

		faces.push(Face {
			normal: to_fixed3(surface.normal.unwrap_or_else(|| face_normal(mesh, face))),
			indices: indices,
			flags: flags,
			texture: texture,
		});
	}

	Ok(Model {
		vertices: vertices,
		faces: faces,
	})
}

/// Normalized sum of the corner normals, or the geometric normal if the corners have none
fn face_normal(mesh: &Mesh, face: &scene::Face) -> Vec3 {
	let sum = face.indices().iter()
		.filter_map(|i| mesh.vertices.get(*i)?.normal)
		.fold(Vec3::zero(), |acc, n| acc + n);

	if sum.mag_sq() > 0.0 {
		sum.normalized()
	} else {
		mesh.face_normal(face).unwrap_or_else(Vec3::zero)
	}
}

fn to_fixed3(v: Vec3) -> [Fixed; 3] {
	[Fixed::from_f32(v.x), Fixed::from_f32(v.y), Fixed::from_f32(v.z)]
}
