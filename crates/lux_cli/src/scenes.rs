//! Built-in scenes.
//!
//! Each preset supplies its geometry, the lights it registers for
//! importance sampling, a camera and the render settings it looks right
//! with. Settings can be overridden from the command line.

use clap::ValueEnum;
use lux_renderer::{
    gen_f32, gen_range_f32, AaRect, BvhNode, Camera, CheckerTexture, Color, ConstantMedium, Cuboid,
    Dielectric, DiffuseLight, FlipFace, HittableList, ImageTexture, Lambertian, Material, Metal,
    MovingSphere, NoiseTexture, Object, RenderConfig, Rotate, Scene, SceneResult, Sphere,
    Translate, Vec3,
};
use rand::RngCore;
use std::path::Path;
use std::sync::Arc;

const SKY: Color = Vec3::new(0.70, 0.80, 1.00);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Field of small random spheres around three large ones
    RandomSpheres,
    /// Two checkered spheres
    TwoSpheres,
    /// Marble ground and sphere
    TwoPerlinSpheres,
    /// Image-textured globe
    Earth,
    /// Marble spheres lit by a single rectangle
    SimpleLight,
    /// The Cornell box with two rotated blocks
    CornellBox,
    /// Cornell box with blocks of smoke
    CornellSmoke,
    /// Everything at once
    Final,
}

impl Preset {
    /// Render settings this scene is tuned for.
    pub fn config(self) -> RenderConfig {
        let base = RenderConfig::default();
        match self {
            Preset::RandomSpheres
            | Preset::TwoSpheres
            | Preset::TwoPerlinSpheres
            | Preset::Earth => RenderConfig {
                image_width: 400,
                aspect_ratio: 16.0 / 9.0,
                background: SKY,
                ..base
            },
            Preset::SimpleLight => RenderConfig {
                image_width: 400,
                aspect_ratio: 16.0 / 9.0,
                samples_per_pixel: 400,
                ..base
            },
            Preset::CornellBox => RenderConfig {
                samples_per_pixel: 200,
                ..base
            },
            Preset::CornellSmoke | Preset::Final => RenderConfig {
                samples_per_pixel: 300,
                ..base
            },
        }
    }

    /// Camera framing the scene. The aspect ratio is set by the caller.
    pub fn camera(self) -> Camera {
        let (look_from, look_at, vfov, aperture) = match self {
            Preset::RandomSpheres => (Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0, 0.1),
            Preset::TwoSpheres | Preset::TwoPerlinSpheres | Preset::Earth => {
                (Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0, 0.0)
            }
            Preset::SimpleLight => (Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0), 20.0, 0.0),
            Preset::CornellBox | Preset::CornellSmoke => (
                Vec3::new(278.0, 278.0, -800.0),
                Vec3::new(278.0, 278.0, 0.0),
                40.0,
                0.0,
            ),
            Preset::Final => (
                Vec3::new(478.0, 278.0, -600.0),
                Vec3::new(278.0, 278.0, 0.0),
                40.0,
                0.0,
            ),
        };

        Camera::new()
            .with_position(look_from, look_at, Vec3::Y)
            .with_lens(vfov, aperture, 10.0)
            .with_shutter(0.0, 1.0)
    }

    /// Build the scene for the shutter interval `(time0, time1)`.
    ///
    /// `earth` is the image used by presets with a textured globe; a
    /// missing file renders cyan instead of failing.
    pub fn build(self, earth: &Path, shutter: (f32, f32), rng: &mut dyn RngCore) -> SceneResult<Scene> {
        let (objects, lights) = match self {
            Preset::RandomSpheres => random_spheres(rng),
            Preset::TwoSpheres => two_spheres(),
            Preset::TwoPerlinSpheres => two_perlin_spheres(rng),
            Preset::Earth => earth_scene(earth),
            Preset::SimpleLight => simple_light(rng),
            Preset::CornellBox => cornell_box(),
            Preset::CornellSmoke => cornell_smoke(),
            Preset::Final => final_scene(earth, rng)?,
        };

        let (time0, time1) = shutter;
        Scene::from_objects(objects, lights, time0, time1, rng)
    }
}

fn material(material: impl Into<Material>) -> Arc<Material> {
    Arc::new(material.into())
}

fn random_vec(rng: &mut dyn RngCore, min: f32, max: f32) -> Vec3 {
    Vec3::new(
        gen_range_f32(rng, min, max),
        gen_range_f32(rng, min, max),
        gen_range_f32(rng, min, max),
    )
}

fn checker() -> Arc<Material> {
    material(Lambertian::textured(CheckerTexture::new(
        Vec3::new(0.2, 0.3, 0.1),
        Vec3::splat(0.9),
    )))
}

fn random_spheres(rng: &mut dyn RngCore) -> (HittableList, HittableList) {
    let mut world = HittableList::new();
    world.add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, checker()));

    for a in -11..11 {
        for b in -11..11 {
            let choose = gen_f32(rng);
            let center = Vec3::new(a as f32 + 0.9 * gen_f32(rng), 0.2, b as f32 + 0.9 * gen_f32(rng));

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose < 0.8 {
                let albedo = random_vec(rng, 0.0, 1.0) * random_vec(rng, 0.0, 1.0);
                let center1 = center + Vec3::new(0.0, gen_range_f32(rng, 0.0, 0.5), 0.0);
                world.add(MovingSphere::new(
                    center,
                    center1,
                    0.0,
                    1.0,
                    0.2,
                    material(Lambertian::new(albedo)),
                ));
            } else if choose < 0.95 {
                let albedo = random_vec(rng, 0.5, 1.0);
                let fuzz = gen_range_f32(rng, 0.0, 0.5);
                world.add(Sphere::new(center, 0.2, material(Metal::new(albedo, fuzz))));
            } else {
                world.add(Sphere::new(center, 0.2, material(Dielectric::new(1.5))));
            }
        }
    }

    world.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, material(Dielectric::new(1.5))));
    world.add(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        material(Lambertian::new(Vec3::new(0.4, 0.2, 0.1))),
    ));
    world.add(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        material(Metal::new(Vec3::new(0.7, 0.6, 0.5), 0.0)),
    ));

    (world, HittableList::new())
}

fn two_spheres() -> (HittableList, HittableList) {
    let checker = checker();
    let mut world = HittableList::new();
    world.add(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, checker.clone()));
    world.add(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, checker));
    (world, HittableList::new())
}

/// Marble ground with a marble sphere resting on it.
fn marble_pair(rng: &mut dyn RngCore) -> HittableList {
    let marble = material(Lambertian::textured(NoiseTexture::new(4.0, rng)));
    let mut world = HittableList::new();
    world.add(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, marble.clone()));
    world.add(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble));
    world
}

fn two_perlin_spheres(rng: &mut dyn RngCore) -> (HittableList, HittableList) {
    (marble_pair(rng), HittableList::new())
}

fn earth_scene(earth: &Path) -> (HittableList, HittableList) {
    let surface = material(Lambertian::textured(ImageTexture::load_or_empty(earth)));
    let mut world = HittableList::new();
    world.add(Sphere::new(Vec3::ZERO, 2.0, surface));
    (world, HittableList::new())
}

fn simple_light(rng: &mut dyn RngCore) -> (HittableList, HittableList) {
    let mut world = marble_pair(rng);
    let light = Arc::new(Object::from(AaRect::xy(
        3.0,
        5.0,
        1.0,
        3.0,
        -2.0,
        material(DiffuseLight::new(Vec3::splat(4.0))),
    )));
    world.add_shared(light.clone());

    let mut lights = HittableList::new();
    lights.add_shared(light);
    (world, lights)
}

/// A downward-facing ceiling light at height 554.
fn ceiling_light(x0: f32, x1: f32, z0: f32, z1: f32, intensity: f32) -> Arc<Object> {
    let glow = material(DiffuseLight::new(Vec3::splat(intensity)));
    Arc::new(FlipFace::new(AaRect::xz(x0, x1, z0, z1, 554.0, glow)).into())
}

/// The five walls of the box. The front stays open to the camera.
fn cornell_walls(white: &Arc<Material>) -> HittableList {
    let red = material(Lambertian::new(Vec3::new(0.65, 0.05, 0.05)));
    let green = material(Lambertian::new(Vec3::new(0.12, 0.45, 0.15)));

    let mut walls = HittableList::new();
    walls.add(AaRect::yz(0.0, 555.0, 0.0, 555.0, 555.0, green));
    walls.add(AaRect::yz(0.0, 555.0, 0.0, 555.0, 0.0, red));
    walls.add(AaRect::xz(0.0, 555.0, 0.0, 555.0, 0.0, white.clone()));
    walls.add(AaRect::xz(0.0, 555.0, 0.0, 555.0, 555.0, white.clone()));
    walls.add(AaRect::xy(0.0, 555.0, 0.0, 555.0, 555.0, white.clone()));
    walls
}

/// The tall and the short block, rotated and placed on the floor.
fn cornell_blocks(white: &Arc<Material>) -> [Translate; 2] {
    let tall = Translate::new(
        Rotate::y(Cuboid::new(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white.clone()), 15.0),
        Vec3::new(265.0, 0.0, 295.0),
    );
    let short = Translate::new(
        Rotate::y(Cuboid::new(Vec3::ZERO, Vec3::splat(165.0), white.clone()), -18.0),
        Vec3::new(130.0, 0.0, 65.0),
    );
    [tall, short]
}

fn cornell_box() -> (HittableList, HittableList) {
    let white = material(Lambertian::new(Vec3::splat(0.73)));
    let mut world = cornell_walls(&white);
    for block in cornell_blocks(&white) {
        world.add(block);
    }

    let light = ceiling_light(213.0, 343.0, 227.0, 332.0, 15.0);
    world.add_shared(light.clone());

    let mut lights = HittableList::new();
    lights.add_shared(light);
    (world, lights)
}

fn cornell_smoke() -> (HittableList, HittableList) {
    let white = material(Lambertian::new(Vec3::splat(0.73)));
    let mut world = cornell_walls(&white);

    let [tall, short] = cornell_blocks(&white);
    world.add(ConstantMedium::new(tall, 0.01, Vec3::ZERO));
    world.add(ConstantMedium::new(short, 0.01, Vec3::ONE));

    let light = ceiling_light(113.0, 443.0, 127.0, 432.0, 7.0);
    world.add_shared(light.clone());

    let mut lights = HittableList::new();
    lights.add_shared(light);
    (world, lights)
}

fn final_scene(earth: &Path, rng: &mut dyn RngCore) -> SceneResult<(HittableList, HittableList)> {
    let mut world = HittableList::new();
    let mut lights = HittableList::new();

    let ground = material(Lambertian::new(Vec3::new(0.48, 0.83, 0.53)));
    let mut boxes = HittableList::new();
    const BOXES_PER_SIDE: u32 = 20;
    for i in 0..BOXES_PER_SIDE {
        for j in 0..BOXES_PER_SIDE {
            let w = 100.0;
            let x0 = -1000.0 + i as f32 * w;
            let z0 = -1000.0 + j as f32 * w;
            let y1 = gen_range_f32(rng, 1.0, 101.0);
            boxes.add(Cuboid::new(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + w, y1, z0 + w),
                ground.clone(),
            ));
        }
    }
    world.add(BvhNode::new(boxes.into_objects(), 0.0, 1.0, rng)?);

    let light = ceiling_light(123.0, 423.0, 147.0, 412.0, 7.0);
    world.add_shared(light.clone());
    lights.add_shared(light);

    let center0 = Vec3::new(400.0, 400.0, 200.0);
    world.add(MovingSphere::new(
        center0,
        center0 + Vec3::new(30.0, 0.0, 0.0),
        0.0,
        1.0,
        50.0,
        material(Lambertian::new(Vec3::new(0.7, 0.3, 0.1))),
    ));

    let glass = material(Dielectric::new(1.5));
    let glass_ball = Arc::new(Object::from(Sphere::new(
        Vec3::new(260.0, 150.0, 45.0),
        50.0,
        glass.clone(),
    )));
    world.add_shared(glass_ball.clone());
    lights.add_shared(glass_ball);

    world.add(Sphere::new(
        Vec3::new(0.0, 150.0, 145.0),
        50.0,
        material(Metal::new(Vec3::new(0.8, 0.8, 0.9), 1.0)),
    ));

    // Blue subsurface ball: a glass shell filled with dense medium
    let shell = Arc::new(Object::from(Sphere::new(
        Vec3::new(360.0, 150.0, 145.0),
        70.0,
        glass.clone(),
    )));
    world.add_shared(shell.clone());
    world.add(ConstantMedium::new(shell, 0.2, Vec3::new(0.2, 0.4, 0.9)));

    // Thin mist over the whole scene
    let mist = Sphere::new(Vec3::ZERO, 5000.0, glass);
    world.add(ConstantMedium::new(mist, 0.0001, Vec3::ONE));

    world.add(Sphere::new(
        Vec3::new(400.0, 200.0, 400.0),
        100.0,
        material(Lambertian::textured(ImageTexture::load_or_empty(earth))),
    ));
    world.add(Sphere::new(
        Vec3::new(220.0, 280.0, 300.0),
        80.0,
        material(Lambertian::textured(NoiseTexture::new(0.1, rng))),
    ));

    let white = material(Lambertian::new(Vec3::splat(0.73)));
    let mut cluster = HittableList::new();
    for _ in 0..1000 {
        cluster.add(Sphere::new(random_vec(rng, 0.0, 165.0), 10.0, white.clone()));
    }
    world.add(Translate::new(
        Rotate::y(BvhNode::new(cluster.into_objects(), 0.0, 1.0, rng)?, 15.0),
        Vec3::new(-100.0, 270.0, 395.0),
    ));

    Ok((world, lights))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_renderer::{Hittable, Interval};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ALL: [Preset; 8] = [
        Preset::RandomSpheres,
        Preset::TwoSpheres,
        Preset::TwoPerlinSpheres,
        Preset::Earth,
        Preset::SimpleLight,
        Preset::CornellBox,
        Preset::CornellSmoke,
        Preset::Final,
    ];

    fn missing_texture() -> &'static Path {
        Path::new("does/not/exist.jpg")
    }

    #[test]
    fn test_every_preset_builds() {
        for preset in ALL {
            let mut rng = StdRng::seed_from_u64(7);
            let camera = preset.camera();
            let scene = preset
                .build(missing_texture(), camera.shutter(), &mut rng)
                .unwrap();
            assert!(scene.world().bounding_box(0.0, 1.0).is_some(), "{preset:?}");
        }
    }

    #[test]
    fn test_lit_presets_register_lights() {
        for preset in ALL {
            let mut rng = StdRng::seed_from_u64(7);
            let scene = preset.build(missing_texture(), (0.0, 1.0), &mut rng).unwrap();
            let has_sky = preset.config().background != Vec3::ZERO;
            assert_eq!(scene.lights().is_none(), has_sky, "{preset:?}");
        }
    }

    #[test]
    fn test_cornell_camera_sees_back_wall() {
        let mut rng = StdRng::seed_from_u64(7);
        let camera = Preset::CornellBox.camera().with_aspect_ratio(1.0);
        let scene = Preset::CornellBox
            .build(missing_texture(), camera.shutter(), &mut rng)
            .unwrap();

        // Upper centre of the frame passes above both blocks
        let ray = camera.get_ray(0.5, 0.7, &mut rng);
        let rec = scene
            .world()
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();
        assert!((rec.p.z - 555.0).abs() < 1e-2, "hit at {}", rec.p);
        assert!(rec.normal.z < 0.0);
    }

    #[test]
    fn test_preset_names() {
        let preset = Preset::from_str("cornell-box", false).unwrap();
        assert_eq!(preset, Preset::CornellBox);
        assert!(Preset::from_str("two-perlin-spheres", false).is_ok());
        assert!(Preset::from_str("teapot", false).is_err());
    }

    #[test]
    fn test_presets_are_reproducible() {
        let build = || {
            let mut rng = StdRng::seed_from_u64(11);
            Preset::RandomSpheres
                .build(missing_texture(), (0.0, 1.0), &mut rng)
                .unwrap()
                .world()
                .bounding_box(0.0, 1.0)
                .unwrap()
        };
        let (a, b) = (build(), build());
        assert_eq!(a.min(), b.min());
        assert_eq!(a.max(), b.max());
    }
}
