use std::process::ExitCode;

use learn_ngin::{
    Demo, DemoConfig, Engine, Entity, Result, Setup, Stage,
    animation::tumble,
    camera::{Projection, look_at},
    cgmath::{Point3, Vector3},
    data_structures::{
        material::{MaterialDesc, Parameter},
        texture::SamplerDesc,
        vertex::VertexLayout,
    },
    pipelines::BAKED_TEXTURE,
    resources::{load_mesh, texture::load_rgba_texture},
};

const MESH_FILE: &str = "cube.obj";
const TEXTURE_FILE: &str = "rgba8_200x200.rgba";
const TEXTURE_SIZE: u32 = 200;

struct CubeObj {
    cube: Entity,
}

impl Demo for CubeObj {
    async fn assemble(setup: Setup<'_>) -> Result<Self> {
        let Setup {
            engine,
            entities,
            stage,
            config,
        } = setup;

        let material = engine.create_material(MaterialDesc {
            label: "baked texture",
            package: &BAKED_TEXTURE,
            layout: VertexLayout::Mesh,
            morphing: false,
        })?;
        let instance = engine.create_material_instance(material)?;

        let texture_path = config.asset(TEXTURE_FILE);
        match load_rgba_texture(engine, &texture_path, TEXTURE_SIZE, TEXTURE_SIZE).await {
            Ok(texture) => engine.set_parameter(
                instance,
                Parameter::Albedo(texture, SamplerDesc::linear_clamped()),
            )?,
            Err(e) => log::warn!("{e}, drawing the cube untextured"),
        }

        let mesh = load_mesh(engine, entities, &config.asset(MESH_FILE), instance).await?;
        engine.scene_add_entity(stage.scene, mesh.entity)?;

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

        Ok(Self { cube: mesh.entity })
    }

    fn update(&mut self, engine: &mut Engine, _: &Stage, time: f32) -> Result<()> {
        engine.set_transform(self.cube, tumble(time).matrix());
        Ok(())
    }
}

fn main() -> ExitCode {
    learn_ngin::launch::<CubeObj>(DemoConfig::new("02 cube obj"))
}
