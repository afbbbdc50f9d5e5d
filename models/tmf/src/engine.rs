//! Render tables in the shape the Saturn 3D libraries consume (`PDATA`, `POLYGON`, `ATTR`)

use bitflags::bitflags;

use tmfkit_core::fixed::Fixed;

pub const NO_TEXTURE: u16 = 0xFFFF;
pub const NO_PALET: u16 = 0x0000;
pub const NO_OPTION: u16 = 0x0000;
/// Transparent color key for sprite registration
pub const COLOR_TRANSPARENT: u16 = 0x0000;

bitflags! {
	/// Color and draw mode bits shared by the gouraud and mode fields
	pub struct DrawMode: u16 {
		const CL32KRGB = 5 << 3;
		const MESH_ON = 1 << 8;
	}
}

impl DrawMode {
	pub const MESH_OFF: DrawMode = DrawMode::empty();
	pub const NO_GOURAUD: DrawMode = DrawMode::empty();
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Plane {
	Single = 0,
	Dual = 1,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Sort {
	/// Depth-sorted by the polygon's center
	Center,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Sprite {
	/// Flat polygon, no texture
	Polygon,
	/// Textured, not flipped
	NoFlip,
}

/// Per-face render attributes
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Attribute {
	pub plane: Plane,
	pub sort: Sort,
	pub texture: u16,
	pub color: u16,
	pub gouraud: DrawMode,
	pub mode: DrawMode,
	pub sprite: Sprite,
	pub option: u16,
}

pub type Point = [Fixed; 3];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Polygon {
	pub normal: [Fixed; 3],
	pub vertices: [u16; 4],
}

/// An engine mesh. Owns all of its tables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
	pub points: Vec<Point>,
	pub polygons: Vec<Polygon>,
	/// One per polygon, same order
	pub attributes: Vec<Attribute>,
}

impl Mesh {
	pub fn num_points(&self) -> usize {
		self.points.len()
	}

	pub fn num_polygons(&self) -> usize {
		self.polygons.len()
	}
}
