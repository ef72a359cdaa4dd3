/// Vertex buffer handle (interleaved vertices + optional indices)
///
/// Draw counts are expressed in faces when indices are present and in
/// vertices otherwise. Out-of-range draws and draws on an unbound buffer
/// are silently skipped.

use bytemuck::Pod;
use crate::error::{Error, Result};
use crate::graphics_device::{
    BufferKind, BufferUsage, DrawCall, ElementType, GraphicsDevice, IndexSize,
    VertexAttribute, MAX_TEX_COORDS,
};
use crate::render_context::RenderContext;
use crate::render_object::{BufferKey, RenderObjects};
use crate::render_object::render_objects::BufferObject;

/// Integer types usable as indices
pub trait IndexElement: Pod {
    const SIZE: IndexSize;
}

impl IndexElement for u16 {
    const SIZE: IndexSize = IndexSize::U16;
}

impl IndexElement for u32 {
    const SIZE: IndexSize = IndexSize::U32;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VertexBuffer {
    key: Option<BufferKey>,
}

impl VertexBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> Option<BufferKey> {
        self.key
    }

    fn object<'a>(&self, objects: &'a RenderObjects) -> Option<&'a BufferObject> {
        objects.buffers.get(self.key?)
    }

    fn object_mut<'a>(&self, objects: &'a mut RenderObjects) -> Option<&'a mut BufferObject> {
        objects.buffers.get_mut(self.key?)
    }

    fn ensure_object<'a>(&mut self, objects: &'a mut RenderObjects) -> &'a mut BufferObject {
        let key = match self.key.filter(|key| objects.buffers.contains_key(*key)) {
            Some(key) => key,
            None => {
                let key = objects.buffers.insert(BufferObject::new());
                self.key = Some(key);
                key
            }
        };
        &mut objects.buffers[key]
    }

    // ===== DATA =====

    /// Upload interleaved vertices; the vertex type is the stride
    ///
    /// Positions sit at offset 0 (4 components for quads, 3 otherwise).
    pub fn gen_vertex_data<T: Pod>(
        &mut self,
        vertices: &[T],
        usage: BufferUsage,
        ctx: &mut RenderContext,
    ) -> Result<()> {
        let stride = std::mem::size_of::<T>() as u32;
        let (device, objects) = ctx.device_and_objects();
        let object = self.ensure_object(objects);

        if vertices.is_empty() || stride == 0 {
            object.vertex_count = 0;
            crate::engine_warn!("lumen3d::VertexBuffer", "Unable to gen vertices: invalid data");
            return Err(Error::InvalidResource("empty vertex data".to_string()));
        }

        object.vertex_data = bytemuck::cast_slice(vertices).to_vec();
        object.vertex_usage = usage;
        object.layout.stride = stride;
        upload_vertices(object, device)?;
        object.vertex_count = vertices.len() as u32;
        Ok(())
    }

    /// Upload indices; the count must cover whole faces
    pub fn gen_index_data<I: IndexElement>(
        &mut self,
        indices: &[I],
        element_type: ElementType,
        usage: BufferUsage,
        ctx: &mut RenderContext,
    ) -> Result<()> {
        let faces = indices.len() as u32 / element_type.indices_per_face();
        let (device, objects) = ctx.device_and_objects();
        let object = self.ensure_object(objects);

        if faces == 0 {
            object.element_count = 0;
            crate::engine_warn!("lumen3d::VertexBuffer", "Unable to gen indices: invalid data");
            return Err(Error::InvalidResource("empty index data".to_string()));
        }

        let used = (faces * element_type.indices_per_face()) as usize;
        object.index_data = bytemuck::cast_slice(&indices[..used]).to_vec();
        object.index_usage = usage;
        object.element_type = element_type;
        object.index_size = I::SIZE;
        object.layout.position_dimension = element_type.position_dimension();
        upload_indices(object, device)?;
        object.element_count = faces;
        Ok(())
    }

    // ===== LAYOUT =====

    /// Declare 3-component normals at `offset` bytes
    pub fn set_normals(&mut self, offset: u32, ctx: &mut RenderContext) {
        let (_, objects) = ctx.device_and_objects();
        self.ensure_object(objects).layout.normals = Some(VertexAttribute { offset, dimension: 3 });
    }

    /// Declare a texture coordinate stream; indices past the limit are ignored
    pub fn set_tex_coord(&mut self, idx: usize, offset: u32, dimension: u32, ctx: &mut RenderContext) {
        if idx >= MAX_TEX_COORDS {
            return;
        }
        let (_, objects) = ctx.device_and_objects();
        self.ensure_object(objects).layout.tex_coords[idx] = Some(VertexAttribute { offset, dimension });
    }

    pub fn set_colors(&mut self, offset: u32, dimension: u32, ctx: &mut RenderContext) {
        let (_, objects) = ctx.device_and_objects();
        self.ensure_object(objects).layout.colors = Some(VertexAttribute { offset, dimension });
    }

    // ===== BINDING =====

    /// Bind vertex and index streams, recreating them after a device loss
    pub fn bind(&self, ctx: &mut RenderContext) -> Result<()> {
        let (device, objects) = ctx.device_and_objects();
        let Some(object) = self.object_mut(objects) else {
            return Ok(());
        };

        if object.vertex_buffer.is_none() && !object.vertex_data.is_empty() {
            upload_vertices(object, device)?;
        }
        if object.index_buffer.is_none() && !object.index_data.is_empty() {
            upload_indices(object, device)?;
        }

        if let Some(buffer) = object.vertex_buffer {
            device.bind_vertex_buffer(Some(buffer), &object.layout);
            object.vertex_bound = true;
        }
        if let Some(buffer) = object.index_buffer {
            device.bind_index_buffer(Some(buffer), object.index_size);
            object.index_bound = true;
        }
        Ok(())
    }

    pub fn unbind(&self, ctx: &mut RenderContext) {
        let (device, objects) = ctx.device_and_objects();
        let Some(object) = self.object_mut(objects) else {
            return;
        };

        if object.vertex_bound {
            device.bind_vertex_buffer(None, &object.layout);
            object.vertex_bound = false;
        }
        if object.index_bound {
            device.bind_index_buffer(None, object.index_size);
            object.index_bound = false;
        }
    }

    // ===== DRAWING =====

    /// Draw every face (or vertex when not indexed)
    pub fn draw(&self, ctx: &mut RenderContext) {
        let Some(object) = self.object(ctx.objects()) else {
            return;
        };
        let count = if object.index_bound { object.element_count } else { object.vertex_count };
        self.draw_range(0, count, ctx);
    }

    /// Draw `count` faces starting at face `offset` (vertices when not indexed)
    pub fn draw_range(&self, offset: u32, count: u32, ctx: &mut RenderContext) {
        let (device, objects) = ctx.device_and_objects();
        let Some(object) = self.object(objects) else {
            return;
        };
        if !object.vertex_bound {
            return;
        }

        let call = if object.index_bound {
            if offset.saturating_add(count) > object.element_count {
                return;
            }
            let per_face = object.element_type.indices_per_face();
            DrawCall {
                element_type: object.element_type,
                first: offset * per_face,
                count: count * per_face,
                indexed: Some(object.index_size),
            }
        } else {
            if offset.saturating_add(count) > object.vertex_count {
                return;
            }
            DrawCall {
                element_type: ElementType::Triangles,
                first: offset,
                count,
                indexed: None,
            }
        };
        device.draw(&call);
    }

    // ===== LIFECYCLE =====

    /// Destroy the device buffers and free the slot
    pub fn release(&mut self, ctx: &mut RenderContext) {
        self.unbind(ctx);
        let Some(key) = self.key.take() else {
            return;
        };
        let (device, objects) = ctx.device_and_objects();
        if let Some(mut object) = objects.buffers.remove(key) {
            object.destroy(device);
        }
    }

    /// Vertices uploaded and the slot still alive
    pub fn is_valid(&self, ctx: &RenderContext) -> bool {
        self.object(ctx.objects()).is_some_and(|o| o.vertex_count > 0)
    }

    pub fn vertex_count(&self, ctx: &RenderContext) -> u32 {
        self.object(ctx.objects()).map_or(0, |o| o.vertex_count)
    }

    /// Face count of the index data
    pub fn element_count(&self, ctx: &RenderContext) -> u32 {
        self.object(ctx.objects()).map_or(0, |o| o.element_count)
    }

    pub fn element_type(&self, ctx: &RenderContext) -> Option<ElementType> {
        self.object(ctx.objects()).map(|o| o.element_type)
    }
}

fn upload_vertices(object: &mut BufferObject, device: &mut dyn GraphicsDevice) -> Result<()> {
    let buffer = match object.vertex_buffer {
        Some(buffer) => buffer,
        None => {
            let buffer = device.create_buffer(BufferKind::Vertex)?;
            object.vertex_buffer = Some(buffer);
            buffer
        }
    };
    device.upload_buffer(buffer, &object.vertex_data, object.vertex_usage)
}

fn upload_indices(object: &mut BufferObject, device: &mut dyn GraphicsDevice) -> Result<()> {
    let buffer = match object.index_buffer {
        Some(buffer) => buffer,
        None => {
            let buffer = device.create_buffer(BufferKind::Index)?;
            object.index_buffer = Some(buffer);
            buffer
        }
    };
    device.upload_buffer(buffer, &object.index_data, object.index_usage)
}

#[cfg(test)]
#[path = "vertex_buffer_tests.rs"]
mod tests;
