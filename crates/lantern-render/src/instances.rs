use glam::{Mat4, Vec3};
use lantern_core::LanternInstance;

/// Per-instance vertex data: model matrix columns and emissive
/// (rgb pre-multiplied by intensity, alpha = opacity).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub emissive: [f32; 4],
}

impl InstanceRaw {
    const ATTRIBS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

pub fn lantern_instances(
    lanterns: &[LanternInstance],
    emissive_color: Vec3,
    opacity: f32,
    out: &mut Vec<InstanceRaw>,
) {
    out.clear();
    out.extend(lanterns.iter().map(|l| InstanceRaw {
        model: l.model_matrix().to_cols_array_2d(),
        emissive: (emissive_color * l.emissive_intensity).extend(opacity).to_array(),
    }));
}

/// Baskets follow their lantern's transform, dropped by `offset_y` in the
/// lantern's local frame. They are opaque and never glow.
pub fn basket_instances(lanterns: &[LanternInstance], offset_y: f32, out: &mut Vec<InstanceRaw>) {
    let drop = Mat4::from_translation(Vec3::new(0.0, offset_y, 0.0));
    out.clear();
    out.extend(lanterns.iter().map(|l| InstanceRaw {
        model: (l.model_matrix() * drop).to_cols_array_2d(),
        emissive: [0.0, 0.0, 0.0, 1.0],
    }));
}
