use std::process::ExitCode;

use learn_ngin::{
    Demo, DemoConfig, Engine, Entity, Result, Setup, Stage,
    animation::tumble,
    camera::{Projection, look_at},
    cgmath::{Point3, Vector3},
    data_structures::{
        geometry::{Aabb, Indices, VertexBufferDesc},
        material::{MaterialDesc, Parameter},
        renderable::{Primitive, RenderableDesc},
        texture::SamplerDesc,
        vertex::{TexturedVertex, VertexLayout},
    },
    pipelines::BAKED_TEXTURE,
    resources::texture::load_rgba_texture,
};

const TEXTURE_FILE: &str = "rgba8_200x200.rgba";
const TEXTURE_SIZE: u32 = 200;

const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
];

/// Every face maps the whole texture, top row at the top edge.
fn cube_vertices() -> Vec<TexturedVertex> {
    FACES
        .iter()
        .flat_map(|(n, u, v)| {
            [
                (-1.0, -1.0, [0.0, 1.0]),
                (1.0, -1.0, [1.0, 1.0]),
                (1.0, 1.0, [1.0, 0.0]),
                (-1.0, 1.0, [0.0, 0.0]),
            ]
            .map(|(a, b, uv)| TexturedVertex {
                position: [
                    0.5 * (n[0] + a * u[0] + b * v[0]),
                    0.5 * (n[1] + a * u[1] + b * v[1]),
                    0.5 * (n[2] + a * u[2] + b * v[2]),
                ],
                uv,
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

struct CubeMap {
    cube: Entity,
}

impl Demo for CubeMap {
    async fn assemble(setup: Setup<'_>) -> Result<Self> {
        let Setup {
            engine,
            entities,
            stage,
            config,
        } = setup;

        let texture = load_rgba_texture(
            engine,
            &config.asset(TEXTURE_FILE),
            TEXTURE_SIZE,
            TEXTURE_SIZE,
        )
        .await?;

        let vertices = cube_vertices();
        let indices = cube_indices();
        let vertex_buffer = engine.create_vertex_buffer(VertexBufferDesc::new(
            "textured cube",
            VertexLayout::Textured,
            &vertices,
        ))?;
        let index_buffer = engine.create_index_buffer("textured cube", Indices::U16(&indices))?;
        let material = engine.create_material(MaterialDesc {
            label: "baked texture",
            package: &BAKED_TEXTURE,
            layout: VertexLayout::Textured,
            morphing: false,
        })?;
        let instance = engine.create_material_instance(material)?;
        engine.set_parameter(
            instance,
            Parameter::Albedo(texture, SamplerDesc::linear_clamped()),
        )?;

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
                Point3::new(0.0, 0.0, 3.0),
                Point3::new(0.0, 0.0, 0.0),
                Vector3::unit_y(),
            ),
        );
        engine.view_set_camera(stage.view, camera)?;

        Ok(Self { cube })
    }

    fn update(&mut self, engine: &mut Engine, _: &Stage, time: f32) -> Result<()> {
        engine.set_transform(self.cube, tumble(time).matrix());
        Ok(())
    }
}

fn main() -> ExitCode {
    learn_ngin::launch::<CubeMap>(DemoConfig::new("02 cube map"))
}
