use std::collections::TryReserveError;

use crate::{
	attribute::synthesize,
	engine::{
		Mesh,
		Polygon
	},
	ImportCfg,
	ImportFlag,
	loader::TextureTable,
	tmf::{
		import::TmfImportError,
		Model,
		TextureEntry,
		Tmf
	}
};

/// Builds one engine mesh per model. On error nothing is returned and every
/// table built so far is dropped.
pub fn materialize(tmf: &Tmf, table: &TextureTable, cfg: &ImportCfg) -> Result<Vec<Mesh>, TmfImportError> {
	let mut meshes = alloc(tmf.models.len())?;

	for model in tmf.models.iter() {
		meshes.push(build_mesh(model, &tmf.textures, table, cfg)?);
	}

	Ok(meshes)
}

fn build_mesh(model: &Model, textures: &[TextureEntry], table: &TextureTable, cfg: &ImportCfg)
	-> Result<Mesh, TmfImportError>
{
	let mut points = alloc(model.vertices.len())?;
	let mut polygons = alloc(model.faces.len())?;
	let mut attributes = alloc(model.faces.len())?;

	points.extend_from_slice(&model.vertices);

	for face in model.faces.iter() {
		let texture = textures.get(face.texture as usize).ok_or(TmfImportError::TextureIndex {
			index: face.texture,
			count: textures.len(),
		})?;

		if cfg.flags.contains(ImportFlag::CHECK_VERTEX_INDICES) {
			if let Some(idx) = face.indices.iter().find(|i| **i as usize >= model.vertices.len()) {
				return Err(TmfImportError::VertexIndex {
					index: *idx,
					count: model.vertices.len(),
				});
			}
		}

		polygons.push(Polygon {
			normal: face.normal,
			vertices: face.indices,
		});
		attributes.push(synthesize(face, texture, table)?);
	}

	Ok(Mesh {
		points: points,
		polygons: polygons,
		attributes: attributes,
	})
}

fn alloc<T>(len: usize) -> Result<Vec<T>, TryReserveError> {
	let mut table = Vec::new();
	table.try_reserve_exact(len)?;

	Ok(table)
}
