//! Screen-space to NDC geometry generation
//!
//! UI space has its origin at the top-left corner with Y growing downwards;
//! NDC spans [-1, 1] on both axes with Y growing downwards as well (Vulkan
//! convention), so the conversion is a scale and an offset.

use super::vertex::{PanelVertex, UIVertex};
use crate::foundation::math::{Rect, Vec2};

/// Convert screen coordinates to normalized device coordinates (NDC)
pub fn screen_to_ndc(point: Vec2, viewport: Vec2) -> [f32; 2] {
    [
        (point.x / viewport.x) * 2.0 - 1.0,
        (point.y / viewport.y) * 2.0 - 1.0,
    ]
}

/// Convert pixel size to NDC size
pub fn size_to_ndc(size: Vec2, viewport: Vec2) -> [f32; 2] {
    [(size.x / viewport.x) * 2.0, (size.y / viewport.y) * 2.0]
}

fn corners(rect: &Rect, viewport: Vec2) -> ([f32; 2], [f32; 2]) {
    let [x, y] = screen_to_ndc(rect.origin, viewport);
    let [w, h] = size_to_ndc(rect.size, viewport);
    ([x, y], [x + w, y + h])
}

/// Two triangles covering `rect`
pub fn panel_quad(rect: &Rect, viewport: Vec2) -> [PanelVertex; 6] {
    let ([x1, y1], [x2, y2]) = corners(rect, viewport);
    [
        PanelVertex { position: [x1, y1] },
        PanelVertex { position: [x2, y1] },
        PanelVertex { position: [x1, y2] },
        PanelVertex { position: [x1, y2] },
        PanelVertex { position: [x2, y1] },
        PanelVertex { position: [x2, y2] },
    ]
}

/// Two textured triangles covering `rect`, optionally mirrored
pub fn textured_quad(rect: &Rect, viewport: Vec2, flip_x: bool, flip_y: bool) -> [UIVertex; 6] {
    let ([x1, y1], [x2, y2]) = corners(rect, viewport);
    let (u1, u2) = if flip_x { (1.0, 0.0) } else { (0.0, 1.0) };
    let (v1, v2) = if flip_y { (1.0, 0.0) } else { (0.0, 1.0) };
    [
        UIVertex { position: [x1, y1], uv: [u1, v1] },
        UIVertex { position: [x2, y1], uv: [u2, v1] },
        UIVertex { position: [x1, y2], uv: [u1, v2] },
        UIVertex { position: [x1, y2], uv: [u1, v2] },
        UIVertex { position: [x2, y1], uv: [u2, v1] },
        UIVertex { position: [x2, y2], uv: [u2, v2] },
    ]
}

/// Four quads outlining `rect` with a border `width` pixels thick
pub fn border_quads(rect: &Rect, width: f32, viewport: Vec2) -> Vec<PanelVertex> {
    let width = width.min(rect.width() * 0.5).min(rect.height() * 0.5);
    if width <= 0.0 {
        return Vec::new();
    }
    let inner_height = rect.height() - 2.0 * width;
    let edges = [
        Rect::new(rect.x(), rect.y(), rect.width(), width),
        Rect::new(rect.x(), rect.max().y - width, rect.width(), width),
        Rect::new(rect.x(), rect.y() + width, width, inner_height),
        Rect::new(rect.max().x - width, rect.y() + width, width, inner_height),
    ];
    edges.iter().flat_map(|edge| panel_quad(edge, viewport)).collect()
}

/// Triangle fan of a polygon whose points are normalized to `rect`
pub fn polygon_fan(points: &[Vec2], rect: &Rect, viewport: Vec2) -> Vec<PanelVertex> {
    if points.len() < 3 {
        return Vec::new();
    }
    let to_ndc = |point: &Vec2| PanelVertex {
        position: screen_to_ndc(rect.origin + point.component_mul(&rect.size), viewport),
    };

    let anchor = to_ndc(&points[0]);
    points[1..]
        .windows(2)
        .flat_map(|pair| [anchor, to_ndc(&pair[0]), to_ndc(&pair[1])])
        .collect()
}
