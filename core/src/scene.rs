use std::collections::HashMap;

use ultraviolet::vec::Vec3;

use crate::texture::Color;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MatPropValueID {
	Diffuse,
	DiffuseMap,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MatPropValue {
	Text(String),
	Vector3(Vec3),
}

/// [`HashMap`] type alias for material properties
pub type MaterialPropertyMap = HashMap<MatPropValueID, MatPropValue>;

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
	pub name: String,
	pub properties: MaterialPropertyMap,
}

impl Material {
	pub fn new(name: &str) -> Material {
		Material {
			name: name.to_string(),
			properties: MaterialPropertyMap::new(),
		}
	}

	/// Diffuse color, white if unset
	pub fn diffuse(&self) -> Color {
		match self.properties.get(&MatPropValueID::Diffuse) {
			Some(MatPropValue::Vector3(v)) => Color {
				red: v.x,
				green: v.y,
				blue: v.z,
				alpha: 1.0,
			},
			_ => Color::WHITE,
		}
	}

	pub fn set_diffuse(&mut self, color: Color) {
		self.properties.insert(MatPropValueID::Diffuse,
			MatPropValue::Vector3(Vec3::new(color.red, color.green, color.blue)));
	}

	/// Path of the diffuse texture, if any
	pub fn diffuse_map(&self) -> Option<&str> {
		match self.properties.get(&MatPropValueID::DiffuseMap) {
			Some(MatPropValue::Text(path)) if !path.is_empty() => Some(path.as_str()),
			_ => None,
		}
	}

	pub fn set_diffuse_map(&mut self, path: &str) {
		self.properties.insert(MatPropValueID::DiffuseMap, MatPropValue::Text(path.to_string()));
	}
}

/// Node identification type
#[derive(Clone, Debug, PartialEq)]
pub enum ObjRef {
	Name(String),
	Number(u32),
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeData {
	Geometry(Mesh),
	Null,
}

/// Base type of the 3D environment
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: ObjRef,
	pub children: Vec<Node>,
	pub data: NodeData,
}

impl Node {
	pub fn new(id: ObjRef) -> Node {
		Node {
			id: id,
			children: vec![],
			data: NodeData::Null,
		}
	}

	/// Returns this node's mesh, if it holds geometry
	pub fn mesh(&self) -> Option<&Mesh> {
		match &self.data {
			NodeData::Geometry(mesh) => Some(mesh),
			NodeData::Null => None,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
	pub position: Vec3,
	pub normal: Option<Vec3>,
}

impl Vertex {
	pub fn new(position: Vec3) -> Vertex {
		Vertex {
			position: position,
			normal: None,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum Face {
	Triangle([usize; 3]),
	Quad([usize; 4]),
	Ngon(Vec<usize>),
}

impl Face {
	/// Vertex indices, in winding order
	pub fn indices(&self) -> &[usize] {
		match self {
			Face::Triangle(t) => t,
			Face::Quad(q) => q,
			Face::Ngon(n) => n,
		}
	}
}

/// Per-face rendering properties
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Surface {
	/// Index into [`Scene::materials`]
	pub material: Option<usize>,
	pub normal: Option<Vec3>,
	pub double_sided: bool,
	pub meshed: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
	pub vertices: Vec<Vertex>,
	pub faces: Vec<Face>,
	/// Parallel to `faces`; faces past the end use [`Surface::default`]
	pub surfaces: Vec<Surface>,
}

impl Mesh {
	pub fn surface(&self, face: usize) -> Surface {
		self.surfaces.get(face).copied().unwrap_or_default()
	}

	/// Geometric normal of a face, from its first three corners
	pub fn face_normal(&self, face: &Face) -> Option<Vec3> {
		let idx = face.indices();
		if idx.len() < 3 {
			return None;
		}

		let a = self.vertices.get(idx[0])?.position;
		let b = self.vertices.get(idx[1])?.position;
		let c = self.vertices.get(idx[2])?.position;
		let n = (b - a).cross(c - a);

		if n.mag_sq() > 0.0 {
			Some(n.normalized())
		} else {
			None
		}
	}
}

/// Top level of the 3D environment
#[derive(Clone, Debug)]
pub struct Scene {
	pub root: Node,
	pub materials: Vec<Material>,
}

impl Scene {
	pub fn new(root: Node) -> Scene {
		Scene {
			root: root,
			materials: vec![],
		}
	}

	/// Nodes holding geometry: the root's children, or the root itself if it has none
	pub fn geometry_nodes(&self) -> Vec<&Node> {
		if self.root.children.is_empty() {
			return self.root.mesh().map(|_| vec![&self.root]).unwrap_or_default();
		}

		self.root.children.iter().filter(|n| n.mesh().is_some()).collect()
	}
}
