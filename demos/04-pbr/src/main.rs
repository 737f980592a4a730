use std::process::ExitCode;

use learn_ngin::{
    Demo, DemoConfig, Engine, Entity, Result, Setup, Stage,
    animation::spin,
    camera::Projection,
    cgmath::{Matrix4, Vector3},
    data_structures::{
        light::{LightDesc, srgb_to_linear_rgb},
        material::{MaterialDesc, Parameter},
        vertex::VertexLayout,
    },
    pipelines::LIT,
    resources::load_mesh,
    wgpu,
};

const MESH_FILE: &str = "sphere.obj";

struct Pbr {
    mesh: Entity,
    placement: Matrix4<f32>,
}

impl Demo for Pbr {
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

        let material = engine.create_material(MaterialDesc {
            label: "lit",
            package: &LIT,
            layout: VertexLayout::Mesh,
            morphing: false,
        })?;
        let default_instance = engine.default_instance(material)?;
        let mesh = load_mesh(engine, entities, &config.asset(MESH_FILE), default_instance).await?;

        let instance = engine.create_material_instance(material)?;
        engine.set_parameter(instance, Parameter::BaseColor([0.8, 0.8, 0.8, 1.0]))?;
        engine.set_parameter(instance, Parameter::Metallic(1.0))?;
        engine.set_parameter(instance, Parameter::Roughness(0.4))?;
        engine.set_parameter(instance, Parameter::Reflectance(0.5))?;
        engine.set_material_instance_at(mesh.entity, 0, instance)?;

        let placement = Matrix4::from_translation(Vector3::new(0.0, 0.0, -4.0))
            * engine.transform(mesh.entity);
        engine.set_transform(mesh.entity, placement);
        engine.scene_add_entity(stage.scene, mesh.entity)?;

        let sun = entities.create();
        engine.create_light(
            sun,
            LightDesc {
                color: srgb_to_linear_rgb([0.98, 0.92, 0.89]),
                intensity: 110_000.0,
                direction: [0.7, -1.0, -0.8],
                sun_angular_radius: 1.9,
                cast_shadows: false,
                ..LightDesc::sun()
            },
        );
        engine.scene_add_entity(stage.scene, sun)?;

        let camera = entities.create();
        engine.create_camera(camera, Projection::perspective(45.0, config.aspect(), 0.1, 100.0));
        engine.set_transform(camera, Matrix4::from_translation(Vector3::new(0.0, 0.0, 3.0)));
        engine.view_set_camera(stage.view, camera)?;

        Ok(Self {
            mesh: mesh.entity,
            placement,
        })
    }

    fn update(&mut self, engine: &mut Engine, _: &Stage, time: f32) -> Result<()> {
        engine.set_transform(self.mesh, self.placement * Matrix4::from_angle_y(spin(time)));
        Ok(())
    }
}

fn main() -> ExitCode {
    learn_ngin::launch::<Pbr>(DemoConfig::new("04 pbr"))
}
