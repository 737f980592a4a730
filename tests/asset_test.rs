use std::{io::Cursor, path::Path};

use learn_ngin::{
    DemoConfig, DemoError,
    resources::{
        load_binary,
        mesh::{MeshFormat, parse_mesh},
        texture::{decode_image, decode_rgba},
    },
};

use crate::common::test_utils::{assert_close, assert_close_slice};

mod common;

const TRIANGLE_WITHOUT_NORMALS: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";

/// Three positions, no normals, and a triangle whose last index is 7.
const GLTF_INDEX_PAST_END: &str = r#"{
  "asset": { "version": "2.0" },
  "buffers": [{
    "byteLength": 44,
    "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAcAAAA="
  }],
  "bufferViews": [
    { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
    { "buffer": 0, "byteOffset": 36, "byteLength": 6 }
  ],
  "accessors": [
    { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
      "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
    { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
  ],
  "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }] }]
}"#;

#[test]
fn raw_rgba_must_match_its_size() {
    let path = Path::new("small.rgba");
    let image = decode_rgba(vec![7; 2 * 3 * 4], 2, 3, path).unwrap();
    assert_eq!(image.dimensions(), (2, 3));

    match decode_rgba(vec![0; 10], 2, 3, path) {
        Err(DemoError::AssetLoad { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected an asset error, got {other:?}"),
    }
}

#[test]
fn bundled_texture_is_200_square() -> anyhow::Result<()> {
    let path = DemoConfig::default().asset("rgba8_200x200.rgba");
    let bytes = std::fs::read(&path)?;
    let image = decode_rgba(bytes, 200, 200, &path)?;
    assert_eq!(image.dimensions(), (200, 200));
    assert_eq!(image.get_pixel(0, 0).0, [230, 120, 40, 255]);
    Ok(())
}

#[test]
fn encoded_images_decode_to_rgba() -> anyhow::Result<()> {
    let mut source = image::RgbaImage::new(4, 2);
    source.put_pixel(3, 1, image::Rgba([1, 2, 3, 4]));
    let mut png = Vec::new();
    source.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;

    let decoded = decode_image(&png, Path::new("pixel.png"))?;
    assert_eq!(decoded.dimensions(), (4, 2));
    assert_eq!(decoded.get_pixel(3, 1).0, [1, 2, 3, 4]);

    assert!(decode_image(b"not a png", Path::new("broken.png")).is_err());
    Ok(())
}

#[test]
fn mesh_format_follows_extension() {
    assert_eq!(MeshFormat::from_path(Path::new("a/cube.obj")), Some(MeshFormat::Obj));
    assert_eq!(MeshFormat::from_path(Path::new("CUBE.OBJ")), Some(MeshFormat::Obj));
    assert_eq!(MeshFormat::from_path(Path::new("monkey.glb")), Some(MeshFormat::Gltf));
    assert_eq!(MeshFormat::from_path(Path::new("monkey.filamesh")), None);
    assert_eq!(MeshFormat::from_path(Path::new("no_extension")), None);
}

#[test]
fn bundled_cube_has_flat_faces() -> anyhow::Result<()> {
    let path = DemoConfig::default().asset("cube.obj");
    let mesh = parse_mesh(&std::fs::read(&path)?, &path)?;

    assert_eq!(mesh.vertices.len(), 24);
    assert_eq!(mesh.triangle_count(), 12);
    let bounds = mesh.bounds();
    assert_close_slice(&[bounds.min.x, bounds.min.y, bounds.min.z], &[-0.5; 3]);
    assert_close_slice(&[bounds.max.x, bounds.max.y, bounds.max.z], &[0.5; 3]);
    for vertex in &mesh.vertices {
        let [x, y, z] = vertex.normal;
        assert_close(x * x + y * y + z * z, 1.0);
        assert!(vertex.uv.iter().all(|c| (0.0..=1.0).contains(c)));
    }
    Ok(())
}

#[test]
fn bundled_sphere_is_unit_sized() -> anyhow::Result<()> {
    let path = DemoConfig::default().asset("sphere.obj");
    let mesh = parse_mesh(&std::fs::read(&path)?, &path)?;
    let bounds = mesh.bounds();
    assert_close(bounds.max.y, 1.0);
    assert_close(bounds.min.y, -1.0);
    assert!(mesh.triangle_count() > 100);
    Ok(())
}

#[test]
fn missing_normals_are_computed() -> anyhow::Result<()> {
    let mesh = parse_mesh(TRIANGLE_WITHOUT_NORMALS.as_bytes(), Path::new("tri.obj"))?;
    assert_eq!(mesh.triangle_count(), 1);
    for vertex in &mesh.vertices {
        assert_close_slice(&vertex.normal, &[0.0, 0.0, 1.0]);
    }
    Ok(())
}

#[test]
fn obj_without_faces_is_rejected() {
    let result = parse_mesh(b"v 0 0 0\nv 1 0 0\n", Path::new("points.obj"));
    assert!(matches!(result, Err(DemoError::AssetLoad { .. })));
}

#[test]
fn index_past_the_vertices_is_rejected_before_computing_normals() {
    let path = Path::new("broken.gltf");
    match parse_mesh(GLTF_INDEX_PAST_END.as_bytes(), path) {
        Err(DemoError::AssetLoad { path: reported, reason }) => {
            assert_eq!(reported, path);
            assert!(reason.contains("index 7"), "{reason}");
        }
        other => panic!("expected an asset error, got {other:?}"),
    }
}

#[test]
fn unknown_mesh_format_is_rejected() {
    let result = parse_mesh(b"", Path::new("cube.filamesh"));
    assert!(matches!(result, Err(DemoError::AssetLoad { .. })));
}

#[test]
fn garbage_glb_is_rejected() {
    let result = parse_mesh(b"definitely not gltf", Path::new("broken.glb"));
    assert!(matches!(result, Err(DemoError::AssetLoad { .. })));
}

#[tokio::test]
async fn missing_file_is_an_asset_error() {
    let path = Path::new("assets/does-not-exist.obj");
    let error = load_binary(path).await.unwrap_err();
    assert!(matches!(error, DemoError::AssetLoad { .. }));
    assert!(error.to_string().contains("does-not-exist.obj"));
    assert_eq!(error.exit_code(), 1);
}

#[test]
fn assets_fall_back_to_the_bundled_copy() {
    let config = DemoConfig::default().with_asset_dir("/definitely/not/here");
    assert!(config.asset("cube.obj").exists());
    assert_eq!(
        config.asset("nope.bin"),
        Path::new("/definitely/not/here").join("nope.bin")
    );
}
