use std::process::ExitCode;

use learn_ngin::{
    Demo, DemoConfig, Engine, Entity, Result, Setup, Stage,
    animation::morph_weights,
    camera::Projection,
    cgmath::{Matrix4, Vector3},
    data_structures::{
        geometry::{Aabb, Indices, VertexBufferDesc},
        material::MaterialDesc,
        renderable::{Primitive, RenderableDesc},
        vertex::{ColorVertex2, VertexLayout, pack_rgba},
    },
    pipelines::BAKED_COLOR,
};

const ZOOM: f32 = 1.5;

static TRIANGLE_VERTICES: [ColorVertex2; 3] = [
    ColorVertex2 {
        position: [1.0, 0.0],
        color: pack_rgba(255, 0, 0, 255),
    },
    ColorVertex2 {
        position: [-0.5, 0.866],
        color: pack_rgba(0, 255, 0, 255),
    },
    ColorVertex2 {
        position: [-0.5, -0.866],
        color: pack_rgba(0, 0, 255, 255),
    },
];

static TRIANGLE_INDICES: [u16; 3] = [0, 1, 2];

// Offsets added to the base positions, scaled by the target's weight.
static MORPH_TARGET_1: [[f32; 3]; 3] = [[-2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [1.0, 0.0, 0.0]];
static MORPH_TARGET_2: [[f32; 3]; 3] = [[0.0, 2.0, 0.0], [-2.0, 0.0, 0.0], [1.0, 0.0, 0.0]];

struct Morphing {
    triangle: Entity,
}

impl Demo for Morphing {
    async fn assemble(setup: Setup<'_>) -> Result<Self> {
        let Setup {
            engine,
            entities,
            stage,
            config,
        } = setup;

        let vertices = engine.create_vertex_buffer(VertexBufferDesc::new(
            "morphing triangle",
            VertexLayout::Color2D,
            &TRIANGLE_VERTICES,
        ))?;
        let indices =
            engine.create_index_buffer("morphing triangle", Indices::U16(&TRIANGLE_INDICES))?;
        let morph_targets = engine.create_morph_target_buffer(
            "morphing triangle",
            TRIANGLE_VERTICES.len() as u32,
            2,
        )?;
        engine.set_morph_target_positions(morph_targets, 0, &MORPH_TARGET_1)?;
        engine.set_morph_target_positions(morph_targets, 1, &MORPH_TARGET_2)?;

        let material = engine.create_material(MaterialDesc {
            label: "baked color morph",
            package: &BAKED_COLOR,
            layout: VertexLayout::Color2D,
            morphing: true,
        })?;
        let instance = engine.default_instance(material)?;

        let triangle = entities.create();
        engine.create_renderable(
            triangle,
            RenderableDesc {
                bounding_box: Aabb::new([-3.0, -3.0, -1.0], [3.0, 3.0, 1.0]),
                culling: false,
                morph_targets: Some(morph_targets),
                ..Default::default()
            }
            .with_primitive(Primitive::new(vertices, indices, instance)),
        )?;
        engine.scene_add_entity(stage.scene, triangle)?;

        let camera = entities.create();
        engine.create_camera(camera, Projection::ortho_zoom(ZOOM, config.aspect()));
        engine.set_transform(camera, Matrix4::from_translation(Vector3::new(0.0, 0.0, 0.5)));
        engine.view_set_camera(stage.view, camera)?;

        Ok(Self { triangle })
    }

    fn update(&mut self, engine: &mut Engine, _: &Stage, time: f32) -> Result<()> {
        engine.set_morph_weights(self.triangle, &morph_weights(time))
    }
}

fn main() -> ExitCode {
    learn_ngin::launch::<Morphing>(DemoConfig::new("03 morphing"))
}
