use bytemuck::Pod;

/// Smallest allocation handed to the device.
const MIN_CAPACITY_BYTES: u64 = 4096;

/// Next capacity for a buffer that must hold `required` bytes.
///
/// Doubling with a floor keeps reallocation amortized; capacity never
/// shrinks, so a frame smaller than the last one reuses the allocation.
fn grown_capacity(capacity: u64, required: u64) -> u64 {
    MIN_CAPACITY_BYTES.max(required.max(capacity * 2))
}

/// Growable GPU vertex buffer reused across frames.
///
/// Created empty; the device allocation appears on first non-empty upload
/// and is replaced (old one destroyed) whenever the required size exceeds
/// capacity. [`release`] must run on every teardown path — GPU memory is not
/// garbage collected.
///
/// [`release`]: DynamicVertexBuffer::release
#[derive(Debug, Default)]
pub struct DynamicVertexBuffer {
    buffer: Option<wgpu::Buffer>,
    capacity_bytes: u64,
    vertex_count: u32,
}

impl DynamicVertexBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn capacity_bytes(&self) -> u64 {
        self.capacity_bytes
    }

    pub fn buffer(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }

    /// Replaces the buffer contents with `vertices`, growing the allocation
    /// when undersized. An empty upload only resets the vertex count.
    pub fn upload<V: Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &'static str,
        vertices: &[V],
    ) {
        self.vertex_count = vertices.len() as u32;
        if vertices.is_empty() {
            return;
        }

        let data: &[u8] = bytemuck::cast_slice(vertices);
        self.ensure_capacity(device, label, data.len() as u64);

        let Some(buffer) = self.buffer.as_ref() else {
            return;
        };
        queue.write_buffer(buffer, 0, data);
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device, label: &'static str, required: u64) {
        if self.buffer.is_some() && self.capacity_bytes >= required {
            return;
        }

        if let Some(old) = self.buffer.take() {
            old.destroy();
        }

        self.capacity_bytes = grown_capacity(self.capacity_bytes, required);
        self.buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: self.capacity_bytes,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
    }

    /// Destroys the device allocation and zeroes all bookkeeping.
    pub fn release(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            buffer.destroy();
        }
        self.capacity_bytes = 0;
        self.vertex_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The growth policy is pure; exercising it against upload sequences
    // covers the monotonicity contract without a device.

    fn replay(uploads: &[u64]) -> Vec<u64> {
        let mut capacity = 0u64;
        uploads
            .iter()
            .map(|&required| {
                if required > capacity {
                    capacity = grown_capacity(capacity, required);
                }
                capacity
            })
            .collect()
    }

    #[test]
    fn first_allocation_is_at_least_the_floor() {
        assert_eq!(grown_capacity(0, 1), MIN_CAPACITY_BYTES);
        assert_eq!(grown_capacity(0, 4000), MIN_CAPACITY_BYTES);
    }

    #[test]
    fn oversized_request_wins_over_doubling() {
        assert_eq!(grown_capacity(4096, 100_000), 100_000);
    }

    #[test]
    fn doubling_wins_over_small_request() {
        assert_eq!(grown_capacity(8192, 9000), 16_384);
    }

    #[test]
    fn capacity_never_decreases_across_uploads() {
        let caps = replay(&[100, 5000, 20_000, 300, 20_001, 64]);
        for window in caps.windows(2) {
            assert!(window[1] >= window[0], "capacity shrank: {caps:?}");
        }
    }

    #[test]
    fn smaller_upload_after_larger_keeps_capacity() {
        let caps = replay(&[50_000, 100]);
        assert_eq!(caps[1], caps[0]);
    }
}
