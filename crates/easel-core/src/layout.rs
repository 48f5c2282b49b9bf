//! Vertex buffer layouts, counted in buffer elements.
//!
//! Strides and offsets here are numbers of f32 elements, never bytes.
//! Callers hand over the same small integers they see in their data tables
//! (a position-plus-color vertex is "stride 6, color at offset 3") and the
//! multiplication by the element size happens in exactly one place, when a
//! layout is lowered to a GPU descriptor. Pre-multiplied byte values have
//! nowhere to sneak in: a layout whose attributes cannot fit its stride is
//! rejected at construction.

use crate::error::{Error, Result};

/// Size in bytes of one buffer element.
pub const ELEMENT_SIZE: u32 = size_of::<f32>() as u32;

/// Component shape of a single vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrFormat {
    Float32,
    Float32x2,
    Float32x3,
    Float32x4,
}

impl AttrFormat {
    /// Number of f32 components.
    pub fn components(self) -> u32 {
        match self {
            AttrFormat::Float32 => 1,
            AttrFormat::Float32x2 => 2,
            AttrFormat::Float32x3 => 3,
            AttrFormat::Float32x4 => 4,
        }
    }

    /// Size in bytes.
    pub fn byte_size(self) -> u32 {
        self.components() * ELEMENT_SIZE
    }
}

/// One attribute within a [`VertexLayout`]. `offset` counts elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub location: u32,
    pub format: AttrFormat,
    pub offset: u32,
}

impl Attribute {
    /// Offset in bytes from the start of a vertex.
    pub fn byte_offset(self) -> u64 {
        u64::from(self.offset * ELEMENT_SIZE)
    }
}

/// How one vertex buffer's elements map onto shader attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: Vec<Attribute>,
    stride: u32,
}

impl VertexLayout {
    /// A tightly packed buffer feeding a single attribute.
    pub fn single(location: u32, format: AttrFormat) -> Self {
        Self {
            attributes: vec![Attribute {
                location,
                format,
                offset: 0,
            }],
            stride: format.components(),
        }
    }

    /// An interleaved buffer. `stride` and each `(location, format, offset)`
    /// entry's offset count elements.
    pub fn interleaved(stride: u32, attributes: &[(u32, AttrFormat, u32)]) -> Result<Self> {
        if stride == 0 {
            return Err(Error::Layout("stride must be at least one element".into()));
        }
        if attributes.is_empty() {
            return Err(Error::Layout("a layout needs at least one attribute".into()));
        }
        let mut attrs: Vec<Attribute> = Vec::with_capacity(attributes.len());
        for &(location, format, offset) in attributes {
            if offset + format.components() > stride {
                return Err(Error::Layout(format!(
                    "attribute at location {location} occupies elements {offset}..{} but the stride is only {stride}",
                    offset + format.components()
                )));
            }
            if attrs.iter().any(|a| a.location == location) {
                return Err(Error::Layout(format!(
                    "location {location} appears more than once"
                )));
            }
            attrs.push(Attribute {
                location,
                format,
                offset,
            });
        }
        Ok(Self {
            attributes: attrs,
            stride,
        })
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Elements per vertex.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Bytes per vertex. This and [`Attribute::byte_offset`] are the only
    /// spots where element counts turn into bytes.
    pub fn byte_stride(&self) -> u64 {
        u64::from(self.stride * ELEMENT_SIZE)
    }

    /// How many vertices `data` holds under this layout.
    pub fn vertex_count(&self, data: &[f32]) -> Result<u32> {
        let len = data.len() as u32;
        if len % self.stride != 0 {
            return Err(Error::Data(format!(
                "{len} elements do not divide into vertices of {} elements each",
                self.stride
            )));
        }
        Ok(len / self.stride)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_layout_is_tightly_packed() {
        let layout = VertexLayout::single(0, AttrFormat::Float32x2);
        assert_eq!(layout.stride(), 2);
        assert_eq!(layout.byte_stride(), 8);
        assert_eq!(layout.attributes()[0].byte_offset(), 0);
    }

    #[test]
    fn position_color_layout_byte_math() {
        let layout = VertexLayout::interleaved(
            6,
            &[
                (0, AttrFormat::Float32x3, 0),
                (1, AttrFormat::Float32x3, 3),
            ],
        )
        .unwrap();
        assert_eq!(layout.byte_stride(), 24);
        assert_eq!(layout.attributes()[0].byte_offset(), 0);
        assert_eq!(layout.attributes()[1].byte_offset(), 12);
    }

    #[test]
    fn three_attribute_layout_byte_math() {
        // position x2, weight x1, color x3 packed into six elements
        let layout = VertexLayout::interleaved(
            6,
            &[
                (0, AttrFormat::Float32x2, 0),
                (1, AttrFormat::Float32, 2),
                (2, AttrFormat::Float32x3, 3),
            ],
        )
        .unwrap();
        assert_eq!(layout.byte_stride(), 24);
        let offsets: Vec<u64> = layout.attributes().iter().map(|a| a.byte_offset()).collect();
        assert_eq!(offsets, vec![0, 8, 12]);
    }

    #[test]
    fn element_units_never_get_multiplied_twice() {
        let data = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let layout = VertexLayout::interleaved(2, &[(0, AttrFormat::Float32x2, 0)]).unwrap();
        assert_eq!(layout.vertex_count(&data).unwrap(), 3);
        assert_eq!(layout.byte_stride(), 8);
        assert_eq!(layout.attributes()[0].byte_offset(), 0);
    }

    #[test]
    fn attributes_that_cannot_fit_the_stride_are_rejected() {
        // Two two-element attributes cannot share a stride of two.
        let err = VertexLayout::interleaved(
            2,
            &[
                (0, AttrFormat::Float32x2, 0),
                (1, AttrFormat::Float32x2, 2),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, Error::Layout(_)));

        // A byte-valued offset smuggled into an element-valued field.
        let err = VertexLayout::interleaved(6, &[(1, AttrFormat::Float32x3, 12)]).unwrap_err();
        assert!(matches!(err, Error::Layout(_)));
    }

    #[test]
    fn zero_stride_and_empty_layouts_are_rejected() {
        assert!(VertexLayout::interleaved(0, &[(0, AttrFormat::Float32, 0)]).is_err());
        assert!(VertexLayout::interleaved(4, &[]).is_err());
    }

    #[test]
    fn duplicate_locations_are_rejected() {
        let err = VertexLayout::interleaved(
            4,
            &[
                (0, AttrFormat::Float32x2, 0),
                (0, AttrFormat::Float32x2, 2),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, Error::Layout(_)));
    }

    #[test]
    fn partial_final_vertex_is_an_error() {
        let layout = VertexLayout::interleaved(
            6,
            &[
                (0, AttrFormat::Float32x3, 0),
                (1, AttrFormat::Float32x3, 3),
            ],
        )
        .unwrap();
        let data = vec![0.0; 13];
        assert!(matches!(layout.vertex_count(&data), Err(Error::Data(_))));
        let data = vec![0.0; 18];
        assert_eq!(layout.vertex_count(&data).unwrap(), 3);
    }
}
