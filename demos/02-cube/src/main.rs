use std::process::ExitCode;

use learn_ngin::{
    Demo, DemoConfig, Engine, Entity, Result, Setup, Stage,
    animation::spin,
    camera::{Projection, look_at},
    cgmath::{Matrix4, Point3, Rad, Vector3},
    data_structures::{
        geometry::{Aabb, Indices, VertexBufferDesc},
        material::MaterialDesc,
        renderable::{Primitive, RenderableDesc},
        vertex::{ColorVertex3, VertexLayout, pack_rgba},
    },
    pipelines::BAKED_COLOR,
    wgpu,
};

/// Outward normal, right and up axis of each face, seen from outside.
const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
];

const FACE_COLORS: [u32; 6] = [
    pack_rgba(255, 0, 0, 255),
    pack_rgba(0, 255, 0, 255),
    pack_rgba(0, 0, 255, 255),
    pack_rgba(255, 255, 0, 255),
    pack_rgba(255, 0, 255, 255),
    pack_rgba(0, 255, 255, 255),
];

const TILT: Rad<f32> = Rad(0.3);

/// 24 vertices, four per face so every face gets a flat colour.
fn cube_vertices() -> Vec<ColorVertex3> {
    FACES
        .iter()
        .zip(FACE_COLORS)
        .flat_map(|((n, u, v), color)| {
            [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)].map(|(a, b)| ColorVertex3 {
                position: [
                    0.5 * (n[0] + a * u[0] + b * v[0]),
                    0.5 * (n[1] + a * u[1] + b * v[1]),
                    0.5 * (n[2] + a * u[2] + b * v[2]),
                ],
                color,
            })
        })
        .collect()
}

fn cube_indices() -> Vec<u16> {
    (0..6u16)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base, base + 2, base + 3]
        })
        .collect()
}

struct Cube {
    cube: Entity,
}

impl Demo for Cube {
    async fn assemble(setup: Setup<'_>) -> Result<Self> {
        let Setup {
            engine,
            entities,
            stage,
            config,
        } = setup;

        let skybox = engine.create_skybox(wgpu::Color {
            r: 0.1,
            g: 0.125,
            b: 0.25,
            a: 1.0,
        });
        engine.scene_set_skybox(stage.scene, Some(skybox))?;

        let vertices = cube_vertices();
        let indices = cube_indices();
        let vertex_buffer = engine.create_vertex_buffer(VertexBufferDesc::new(
            "cube",
            VertexLayout::Color3D,
            &vertices,
        ))?;
        let index_buffer = engine.create_index_buffer("cube", Indices::U16(&indices))?;
        let material = engine.create_material(MaterialDesc {
            label: "baked color",
            package: &BAKED_COLOR,
            layout: VertexLayout::Color3D,
            morphing: false,
        })?;
        let instance = engine.default_instance(material)?;

        let cube = entities.create();
        engine.create_renderable(
            cube,
            RenderableDesc {
                bounding_box: Aabb::new([-0.5; 3], [0.5; 3]),
                ..Default::default()
            }
            .with_primitive(Primitive::new(vertex_buffer, index_buffer, instance)),
        )?;
        engine.scene_add_entity(stage.scene, cube)?;

        let camera = entities.create();
        engine.create_camera(camera, Projection::perspective(45.0, config.aspect(), 0.1, 100.0));
        engine.set_transform(
            camera,
            look_at(
                Point3::new(0.0, 0.3, 3.0),
                Point3::new(0.0, 0.0, 0.0),
                Vector3::unit_y(),
            ),
        );
        engine.view_set_camera(stage.view, camera)?;

        Ok(Self { cube })
    }

    fn update(&mut self, engine: &mut Engine, _: &Stage, time: f32) -> Result<()> {
        let transform = Matrix4::from_angle_y(spin(time)) * Matrix4::from_angle_x(TILT);
        engine.set_transform(self.cube, transform);
        Ok(())
    }
}

fn main() -> ExitCode {
    learn_ngin::launch::<Cube>(DemoConfig::new("02 cube"))
}
