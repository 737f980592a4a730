use std::process::ExitCode;

use learn_ngin::{
    Demo, DemoConfig, Engine, Result, Setup, Stage,
    camera::Projection,
    cgmath::{Matrix4, Vector3},
    data_structures::{
        geometry::{Aabb, Indices, VertexBufferDesc},
        material::MaterialDesc,
        renderable::{Primitive, RenderableDesc},
        vertex::{ColorVertex2, VertexLayout, pack_rgba},
    },
    pipelines::BAKED_COLOR,
    render::ClearOptions,
    wgpu,
};

const ORANGE: u32 = pack_rgba(255, 140, 0, 255);

static RECTANGLE_VERTICES: [ColorVertex2; 4] = [
    ColorVertex2 {
        position: [-0.5, -0.3],
        color: ORANGE,
    },
    ColorVertex2 {
        position: [0.5, -0.3],
        color: ORANGE,
    },
    ColorVertex2 {
        position: [0.5, 0.3],
        color: ORANGE,
    },
    ColorVertex2 {
        position: [-0.5, 0.3],
        color: ORANGE,
    },
];

static RECTANGLE_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

struct Rectangle;

impl Demo for Rectangle {
    async fn assemble(setup: Setup<'_>) -> Result<Self> {
        let Setup {
            engine,
            entities,
            stage,
            config,
        } = setup;

        engine.set_clear_options(
            stage.renderer,
            ClearOptions {
                clear_color: wgpu::Color {
                    r: 0.1,
                    g: 0.1,
                    b: 0.2,
                    a: 1.0,
                },
                clear: true,
            },
        )?;

        let vertices = engine.create_vertex_buffer(VertexBufferDesc::new(
            "rectangle",
            VertexLayout::Color2D,
            &RECTANGLE_VERTICES,
        ))?;
        let indices = engine.create_index_buffer("rectangle", Indices::U16(&RECTANGLE_INDICES))?;
        let material = engine.create_material(MaterialDesc {
            label: "baked color",
            package: &BAKED_COLOR,
            layout: VertexLayout::Color2D,
            morphing: false,
        })?;
        let instance = engine.default_instance(material)?;

        let rectangle = entities.create();
        engine.create_renderable(
            rectangle,
            RenderableDesc {
                bounding_box: Aabb::new([-0.5, -0.3, 0.0], [0.5, 0.3, 0.0]),
                ..Default::default()
            }
            .with_primitive(Primitive::new(vertices, indices, instance)),
        )?;
        engine.scene_add_entity(stage.scene, rectangle)?;

        let camera = entities.create();
        engine.create_camera(camera, Projection::ortho_zoom(1.0, config.aspect()));
        engine.set_transform(camera, Matrix4::from_translation(Vector3::new(0.0, 0.0, 0.5)));
        engine.view_set_camera(stage.view, camera)?;

        Ok(Rectangle)
    }

    fn update(&mut self, _: &mut Engine, _: &Stage, _: f32) -> Result<()> {
        Ok(())
    }
}

fn main() -> ExitCode {
    learn_ngin::launch::<Rectangle>(DemoConfig::new("01 rectangle"))
}
