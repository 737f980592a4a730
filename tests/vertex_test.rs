use std::mem::size_of;

use learn_ngin::data_structures::{
    geometry::{Aabb, Indices, VertexBufferDesc},
    vertex::{
        ColorVertex2, ColorVertex3, MAX_MORPH_TARGETS, MeshVertex, MorphVertex, TexturedVertex,
        Vertex, VertexLayout, pack_rgba,
    },
};

#[test]
fn vertex_strides_match_the_tutorial_layouts() {
    assert_eq!(size_of::<ColorVertex2>(), 12);
    assert_eq!(size_of::<ColorVertex3>(), 16);
    assert_eq!(size_of::<TexturedVertex>(), 20);
    assert_eq!(size_of::<MeshVertex>(), 32);
    assert_eq!(size_of::<MorphVertex>(), 12 * MAX_MORPH_TARGETS);

    assert_eq!(VertexLayout::Color2D.stride(), 12);
    assert_eq!(VertexLayout::Color3D.stride(), 16);
    assert_eq!(VertexLayout::Textured.stride(), 20);
    assert_eq!(VertexLayout::Mesh.stride(), 32);
}

#[test]
fn packed_colour_is_stored_as_rgba_bytes() {
    let vertex = ColorVertex2 {
        position: [0.0, 0.0],
        color: pack_rgba(0x11, 0x22, 0x33, 0x44),
    };
    let bytes = bytemuck::bytes_of(&vertex);
    assert_eq!(&bytes[8..12], &[0x11, 0x22, 0x33, 0x44]);
}

#[test]
fn colour_attribute_is_normalized_bytes() {
    let layout = ColorVertex3::desc();
    let colour = layout
        .attributes
        .iter()
        .find(|a| a.shader_location == 1)
        .expect("colour attribute");
    assert_eq!(colour.format, wgpu::VertexFormat::Unorm8x4);
    assert_eq!(colour.offset, 12);
}

#[test]
fn morph_targets_use_their_own_locations() {
    let locations: Vec<u32> = MorphVertex::desc()
        .attributes
        .iter()
        .map(|a| a.shader_location)
        .collect();
    assert_eq!(locations, [8, 9, 10, 11]);
}

#[test]
fn entry_points_follow_layout_names() {
    assert_eq!(VertexLayout::Color2D.entry_point(false), "vs_color2d");
    assert_eq!(VertexLayout::Color2D.entry_point(true), "vs_color2d_morph");
    assert_eq!(VertexLayout::Textured.entry_point(false), "vs_textured");
    assert_eq!(VertexLayout::Mesh.entry_point(false), "vs_mesh");
}

#[test]
fn shader_packages_export_their_entry_points() {
    use learn_ngin::pipelines::{BAKED_COLOR, BAKED_TEXTURE, LIT};

    for layout in [VertexLayout::Color2D, VertexLayout::Color3D] {
        for morphing in [false, true] {
            let entry = format!("fn {}(", layout.entry_point(morphing));
            assert!(BAKED_COLOR.source.contains(&entry), "{entry}");
        }
    }
    for layout in [VertexLayout::Textured, VertexLayout::Mesh] {
        let entry = format!("fn {}(", layout.entry_point(false));
        assert!(BAKED_TEXTURE.source.contains(&entry), "{entry}");
    }
    assert!(LIT.source.contains("fn vs_mesh("));
    for package in [&BAKED_COLOR, &BAKED_TEXTURE, &LIT] {
        assert!(package.source.contains("fn fs_main("), "{}", package.name);
    }
}

#[test]
fn vertex_buffer_desc_counts_vertices() {
    let vertices = [
        TexturedVertex {
            position: [0.0; 3],
            uv: [0.0; 2],
        };
        3
    ];
    let desc = VertexBufferDesc::new("tri", VertexLayout::Textured, &vertices);
    assert_eq!(desc.vertex_count, 3);
    assert_eq!(desc.data.len(), 3 * VertexLayout::Textured.stride());
}

#[test]
fn index_formats_follow_width() {
    let short = [0u16, 1, 2, 0, 2, 3];
    let long = [0u32, 1, 2];
    let indices = Indices::U16(&short);
    assert_eq!(indices.len(), 6);
    assert_eq!(indices.format(), wgpu::IndexFormat::Uint16);
    assert_eq!(indices.bytes().len(), 12);

    let indices = Indices::U32(&long);
    assert_eq!(indices.format(), wgpu::IndexFormat::Uint32);
    assert_eq!(indices.bytes().len(), 12);
    assert!(Indices::U16(&[]).is_empty());
}

#[test]
fn bounding_box_encloses_points() {
    let points = [[1.0, -2.0, 0.5], [-1.0, 3.0, 0.0], [0.0, 0.0, -4.0]];
    let aabb = Aabb::from_points(&points);
    assert_eq!(aabb, Aabb::new([-1.0, -2.0, -4.0], [1.0, 3.0, 0.5]));
    assert_eq!(
        Aabb::from_points(&[] as &[[f32; 3]]),
        Aabb::new([0.0; 3], [0.0; 3])
    );
}
