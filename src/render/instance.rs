//! Per-instance GPU data for sphere-ish primitives

use bytemuck::{Pod, Zeroable};

use super::snapshot::RenderSnapshot;

/// One drawn sphere: centre, radius, colour
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SphereInstance {
    pub center: [f32; 3],
    pub radius: f32,
    pub color: [f32; 4],
}

impl SphereInstance {
    pub const fn new(center: [f32; 3], radius: f32, color: [f32; 4]) -> Self {
        Self {
            center,
            radius,
            color,
        }
    }

    /// Instance-rate layout; locations 0 and 1 are left for the mesh vertex
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SphereInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BULLET: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const ORB: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const HIT_FLASH: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
}

pub const BULLET_DRAW_RADIUS: f32 = 0.2;
pub const ORB_DRAW_RADIUS: f32 = 0.3;

/// Sphere instances for bullets, orbs, and hit flashes
pub fn sphere_instances(snapshot: &RenderSnapshot) -> Vec<SphereInstance> {
    let bullets = snapshot
        .bullets
        .iter()
        .map(|b| SphereInstance::new(b.pos.to_array(), BULLET_DRAW_RADIUS, colors::BULLET));
    let orbs = snapshot
        .orbs
        .iter()
        .map(|pos| SphereInstance::new(pos.to_array(), ORB_DRAW_RADIUS, colors::ORB));
    let flashes = snapshot
        .robots
        .iter()
        .filter(|r| r.draw_flash)
        .map(|r| SphereInstance::new(r.pos.to_array(), r.flash_radius, colors::HIT_FLASH));

    bullets.chain(orbs).chain(flashes).collect()
}
