use std::fmt;

use crate::tmf::{
	ModelType,
	Tmf
};

/// Summary of a file's contents
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
	pub kind: ModelType,
	pub objects: usize,
	/// Texture table slots, textured or not
	pub materials: usize,
	/// Names of the textured slots, in table order
	pub textures: Vec<String>,
	pub vertices: usize,
	pub faces: usize,
}

impl Tmf {
	pub fn report(&self) -> Report {
		Report {
			kind: self.kind,
			objects: self.models.len(),
			materials: self.textures.len(),
			textures: self.textures.iter()
				.filter(|t| !t.is_color_only())
				.map(|t| t.file_name.clone())
				.collect(),
			vertices: self.models.iter().map(|m| m.vertices.len()).sum(),
			faces: self.models.iter().map(|m| m.faces.len()).sum(),
		}
	}
}

impl fmt::Display for Report {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, " Model report")?;
		writeln!(f, " Type:           | {:?}", self.kind)?;
		writeln!(f, " Objects:        | {}", self.objects)?;
		writeln!(f, " Materials:      | {}", self.materials)?;
		writeln!(f, " Textures:       | {}", self.textures.len())?;
		writeln!(f, " Total vertices: | {}", self.vertices)?;
		write!(f, " Total faces:    | {}", self.faces)?;

		if !self.textures.is_empty() {
			write!(f, "\n Used textures\n {}", self.textures.join(", "))?;
		}

		Ok(())
	}
}
