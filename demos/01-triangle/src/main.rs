use std::process::ExitCode;

use learn_ngin::{
    Demo, DemoConfig, Engine, Entity, Result, Setup, Stage,
    animation::spin,
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

struct Triangle {
    triangle: Entity,
}

impl Demo for Triangle {
    async fn assemble(setup: Setup<'_>) -> Result<Self> {
        let Setup {
            engine,
            entities,
            stage,
            config,
        } = setup;

        let vertices = engine.create_vertex_buffer(VertexBufferDesc::new(
            "triangle",
            VertexLayout::Color2D,
            &TRIANGLE_VERTICES,
        ))?;
        let indices = engine.create_index_buffer("triangle", Indices::U16(&TRIANGLE_INDICES))?;
        let material = engine.create_material(MaterialDesc {
            label: "baked color",
            package: &BAKED_COLOR,
            layout: VertexLayout::Color2D,
            morphing: false,
        })?;
        let instance = engine.default_instance(material)?;

        let triangle = entities.create();
        engine.create_renderable(
            triangle,
            RenderableDesc {
                bounding_box: Aabb::new([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]),
                culling: false,
                ..Default::default()
            }
            .with_primitive(Primitive::new(vertices, indices, instance)),
        )?;
        engine.scene_add_entity(stage.scene, triangle)?;

        let camera = entities.create();
        engine.create_camera(camera, Projection::ortho_zoom(ZOOM, config.aspect()));
        // the ortho box spans z in [0, 1] in front of the camera
        engine.set_transform(camera, Matrix4::from_translation(Vector3::new(0.0, 0.0, 0.5)));
        engine.view_set_camera(stage.view, camera)?;
        engine.view_set_post_processing(stage.view, false)?;

        Ok(Self { triangle })
    }

    fn update(&mut self, engine: &mut Engine, _: &Stage, time: f32) -> Result<()> {
        engine.set_transform(self.triangle, Matrix4::from_angle_z(spin(time)));
        Ok(())
    }
}

fn main() -> ExitCode {
    learn_ngin::launch::<Triangle>(DemoConfig::new("01 triangle"))
}
