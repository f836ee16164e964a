//! Vertex layout descriptions.
//!
//! A mesh only ever carries positions plus some subset of texture coordinates, normals and
//! tangents. [`VertexComponents`] records which of those are present and [`VertexFormat`] turns
//! that set into the attribute layout the GPU side binds.

use bitflags::bitflags;

bitflags! {
    /// The set of per-vertex attributes present in a packed vertex buffer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct VertexComponents: u8 {
        const POSITIONS = 1 << 0;
        const TEXTURE_COORDINATES = 1 << 1;
        const NORMALS = 1 << 2;
        const TANGENTS = 1 << 3;
    }
}

impl VertexComponents {
    /// Number of floats a single vertex occupies when packed with these components.
    pub fn stride(self) -> usize {
        VertexFormat::from_components(self).stride()
    }
}

/// Scalar type of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexElementType {
    Float32,
    Int32,
    UInt32,
}

impl VertexElementType {
    /// Size of one scalar in bytes.
    pub fn size(self) -> usize {
        match self {
            VertexElementType::Float32 => std::mem::size_of::<f32>(),
            VertexElementType::Int32 => std::mem::size_of::<i32>(),
            VertexElementType::UInt32 => std::mem::size_of::<u32>(),
        }
    }

    /// Whether the attribute has to be bound as an integer attribute.
    pub fn is_integer(self) -> bool {
        !matches!(self, VertexElementType::Float32)
    }
}

/// A single attribute in a [`VertexFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexElement {
    /// Shader attribute location.
    pub index: u32,
    /// Number of scalars in the attribute.
    pub components: usize,
    pub element_type: VertexElementType,
    pub normalized: bool,
}

impl VertexElement {
    pub const fn float32(index: u32, components: usize) -> Self {
        Self {
            index,
            components,
            element_type: VertexElementType::Float32,
            normalized: false,
        }
    }

    /// Size of the whole attribute in bytes.
    pub fn size(&self) -> usize {
        self.components * self.element_type.size()
    }
}

/// Attribute locations used for each vertex component.
pub const POSITION_ATTRIBUTE: VertexElement = VertexElement::float32(0, 3);
pub const TEXTURE_COORDINATE_ATTRIBUTE: VertexElement = VertexElement::float32(1, 2);
pub const NORMAL_ATTRIBUTE: VertexElement = VertexElement::float32(2, 3);
pub const TANGENT_ATTRIBUTE: VertexElement = VertexElement::float32(3, 3);

/// Ordered list of attributes making up one interleaved vertex.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VertexFormat {
    elements: Vec<VertexElement>,
}

impl VertexFormat {
    pub fn new(elements: Vec<VertexElement>) -> Self {
        Self { elements }
    }

    /// Builds the layout for the given components.
    ///
    /// Attributes always appear as position, texture coordinates, normal, tangent; absent
    /// components are skipped. Positions are included even if the flag is missing.
    pub fn from_components(components: VertexComponents) -> Self {
        let mut elements = vec![POSITION_ATTRIBUTE];

        if components.contains(VertexComponents::TEXTURE_COORDINATES) {
            elements.push(TEXTURE_COORDINATE_ATTRIBUTE);
        }

        if components.contains(VertexComponents::NORMALS) {
            elements.push(NORMAL_ATTRIBUTE);
        }

        if components.contains(VertexComponents::TANGENTS) {
            elements.push(TANGENT_ATTRIBUTE);
        }

        Self { elements }
    }

    pub fn elements(&self) -> &[VertexElement] {
        &self.elements
    }

    /// Number of scalars per vertex.
    pub fn stride(&self) -> usize {
        self.elements.iter().map(|e| e.components).sum()
    }

    /// Number of bytes per vertex.
    pub fn stride_bytes(&self) -> usize {
        self.elements.iter().map(VertexElement::size).sum()
    }

    /// Iterates over the attributes together with their byte offset inside a vertex.
    pub fn offsets(&self) -> impl Iterator<Item = (usize, &VertexElement)> {
        self.elements.iter().scan(0, |offset, element| {
            let current = *offset;
            *offset += element.size();
            Some((current, element))
        })
    }
}
