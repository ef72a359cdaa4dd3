/// Buffer and draw descriptor types

/// Maximum number of texture coordinate streams per vertex layout
pub const MAX_TEX_COORDS: usize = 16;

/// What a buffer object stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// Vertex attributes
    Vertex,
    /// Element indices
    Index,
}

/// Update frequency hint for buffer uploads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Uploaded once, drawn many times
    Static,
    /// Re-uploaded frequently
    Dynamic,
}

/// Primitive assembly of indexed geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Triangles,
    TriangleStrip,
    TriangleFan,
    Quads,
}

impl ElementType {
    /// Indices consumed per face
    pub fn indices_per_face(&self) -> u32 {
        match self {
            ElementType::Quads => 4,
            _ => 3,
        }
    }

    /// Position components per vertex (quads carry a 4-component position)
    pub fn position_dimension(&self) -> u32 {
        match self {
            ElementType::Quads => 4,
            _ => 3,
        }
    }
}

/// Index element size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSize {
    /// 16-bit indices
    U16,
    /// 32-bit indices
    U32,
}

impl IndexSize {
    /// Size in bytes of one index
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexSize::U16 => 2,
            IndexSize::U32 => 4,
        }
    }
}

/// A float attribute inside an interleaved vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Offset in bytes from the start of the vertex
    pub offset: u32,
    /// Number of float components
    pub dimension: u32,
}

/// Interleaved vertex layout
///
/// The position attribute always sits at offset 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    /// Stride in bytes between consecutive vertices
    pub stride: u32,
    /// Position component count (3, or 4 for quads)
    pub position_dimension: u32,
    /// Optional normal (always 3 components)
    pub normals: Option<VertexAttribute>,
    /// Optional vertex color
    pub colors: Option<VertexAttribute>,
    /// Optional texture coordinate streams
    pub tex_coords: [Option<VertexAttribute>; MAX_TEX_COORDS],
}

impl Default for VertexLayout {
    fn default() -> Self {
        Self {
            stride: 0,
            position_dimension: 3,
            normals: None,
            colors: None,
            tex_coords: [None; MAX_TEX_COORDS],
        }
    }
}

/// A draw call over the currently bound streams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    /// Primitive assembly
    pub element_type: ElementType,
    /// First vertex (non-indexed) or first index (indexed)
    pub first: u32,
    /// Vertex count (non-indexed) or index count (indexed)
    pub count: u32,
    /// Index size when drawing indexed geometry
    pub indexed: Option<IndexSize>,
}
