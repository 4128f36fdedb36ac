//! Built-in demo scenes.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use ember_renderer::{
    quad_box, Background, BvhNode, Camera, CheckerTexture, Color, ConstantMedium, Dielectric, DiffuseLight,
    Hittable, HittableList, ImageTexture, Lambertian, Material, Metal, NoiseTexture, Perlin, Quad, RotateY,
    Sphere, Texture, Translate, Vec3,
};
use rand::{Rng, RngCore};

const SKY: Background = Background::Sky;
const BLACK: Background = Background::Solid(Color::ZERO);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Ground plane covered in small random spheres around three large ones
    RandomSpheres,
    /// Two checkered spheres stacked on each other
    TwoSpheres,
    /// Marble-textured ground and sphere
    TwoPerlinSpheres,
    /// Five coloured quads facing the camera
    Quads,
    /// Perlin spheres lit by an emissive sphere and quad
    SimpleLight,
    /// Cornell box with two rotated blocks
    CornellBox,
    /// Cornell box with the blocks replaced by smoke
    CornellSmoke,
    /// Image-textured globe (needs --texture)
    Earth,
}

/// A ready-to-render world with its camera (resolution still unset).
pub struct Scene {
    pub world: BvhNode,
    pub camera: Camera,
    pub background: Background,
    /// Width over height of the intended framing
    pub aspect_ratio: f32,
}

impl Scene {
    fn new(world: HittableList, camera: Camera, background: Background, aspect_ratio: f32) -> Self {
        Self {
            world: BvhNode::from_list(world),
            camera,
            background,
            aspect_ratio,
        }
    }
}

/// Build the named scene. Random placement and Perlin tables draw from `rng`.
pub fn build(kind: SceneKind, texture: Option<&Path>, rng: &mut dyn RngCore) -> Result<Scene> {
    log::info!("Building scene {:?}", kind);
    let scene = match kind {
        SceneKind::RandomSpheres => random_spheres(rng)?,
        SceneKind::TwoSpheres => two_spheres()?,
        SceneKind::TwoPerlinSpheres => two_perlin_spheres(rng)?,
        SceneKind::Quads => quads(),
        SceneKind::SimpleLight => simple_light(rng)?,
        SceneKind::CornellBox => cornell_box(false)?,
        SceneKind::CornellSmoke => cornell_box(true)?,
        SceneKind::Earth => match texture {
            Some(path) => earth(path)?,
            None => bail!("the earth scene needs an image passed with --texture"),
        },
    };
    Ok(scene)
}

fn camera(look_from: Vec3, look_at: Vec3, vfov: f32) -> Camera {
    Camera::new()
        .with_position(look_from, look_at, Vec3::Y)
        .with_lens(vfov, 0.0, 10.0)
}

fn lambertian(color: Color) -> Arc<dyn Material> {
    Arc::new(Lambertian::from_color(color))
}

fn ground_checker() -> Arc<dyn Texture> {
    Arc::new(CheckerTexture::uv(
        0.05,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ))
}

fn random_color(rng: &mut dyn RngCore) -> Color {
    Color::new(rng.gen(), rng.gen(), rng.gen())
}

fn random_spheres(rng: &mut dyn RngCore) -> Result<Scene> {
    let mut world = HittableList::new();

    let ground = Arc::new(Lambertian::new(ground_checker()));
    world.add(Box::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground)?));

    for a in -11..=11 {
        for b in -11..=11 {
            let choose_mat: f32 = rng.gen();
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let sphere = if choose_mat < 0.8 {
                // Diffuse, bouncing upwards during the exposure
                let albedo = random_color(rng) * random_color(rng);
                let center1 = center + Vec3::new(0.0, rng.gen_range(0.0..0.5), 0.0);
                Sphere::moving(center, center1, 0.2, lambertian(albedo))?
            } else if choose_mat < 0.95 {
                let albedo = 0.5 * random_color(rng) + Color::splat(0.5);
                let fuzz = rng.gen_range(0.0..0.5);
                Sphere::new(center, 0.2, Arc::new(Metal::from_color(albedo, fuzz)))?
            } else {
                Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5)))?
            };
            world.add(Box::new(sphere));
        }
    }

    world.add(Box::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Dielectric::new(1.5)))?));
    world.add(Box::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        lambertian(Color::new(0.4, 0.2, 0.1)),
    )?));
    world.add(Box::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::from_color(Color::new(0.7, 0.6, 0.5), 0.0)),
    )?));

    let camera = camera(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0).with_lens(20.0, 0.6, 10.0);
    Ok(Scene::new(world, camera, SKY, 16.0 / 9.0))
}

fn two_spheres() -> Result<Scene> {
    let mut world = HittableList::new();
    let checker: Arc<dyn Material> = Arc::new(Lambertian::new(ground_checker()));

    world.add(Box::new(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, Arc::clone(&checker))?));
    world.add(Box::new(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, checker)?));

    let camera = camera(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0);
    Ok(Scene::new(world, camera, SKY, 16.0 / 9.0))
}

fn perlin_ground_and_sphere(world: &mut HittableList, scale: f32, rng: &mut dyn RngCore) -> Result<()> {
    let marble: Arc<dyn Material> = Arc::new(Lambertian::new(Arc::new(NoiseTexture::new(scale, Perlin::new(rng)))));
    world.add(Box::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, Arc::clone(&marble))?));
    world.add(Box::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble)?));
    Ok(())
}

fn two_perlin_spheres(rng: &mut dyn RngCore) -> Result<Scene> {
    let mut world = HittableList::new();
    perlin_ground_and_sphere(&mut world, 2.0, rng)?;

    let camera = camera(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0);
    Ok(Scene::new(world, camera, SKY, 16.0 / 9.0))
}

fn quads() -> Scene {
    let mut world = HittableList::new();

    let left_red = lambertian(Color::new(1.0, 0.2, 0.2));
    let back_green = lambertian(Color::new(0.2, 1.0, 0.2));
    let right_blue = lambertian(Color::new(0.2, 0.2, 1.0));
    let upper_orange = lambertian(Color::new(1.0, 0.5, 0.0));
    let lower_teal = lambertian(Color::new(0.2, 0.8, 0.8));

    let sides = [
        (Vec3::new(-3.0, -2.0, 5.0), Vec3::new(0.0, 0.0, -4.0), Vec3::new(0.0, 4.0, 0.0), left_red),
        (Vec3::new(-2.0, -2.0, 0.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 4.0, 0.0), back_green),
        (Vec3::new(3.0, -2.0, 1.0), Vec3::new(0.0, 0.0, 4.0), Vec3::new(0.0, 4.0, 0.0), right_blue),
        (Vec3::new(-2.0, 3.0, 1.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 4.0), upper_orange),
        (Vec3::new(-2.0, -3.0, 5.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -4.0), lower_teal),
    ];
    for (q, u, v, material) in sides {
        world.add(Box::new(Quad::new(q, u, v, material)));
    }

    let camera = camera(Vec3::new(0.0, 0.0, 9.0), Vec3::ZERO, 80.0);
    Scene::new(world, camera, SKY, 1.0)
}

fn simple_light(rng: &mut dyn RngCore) -> Result<Scene> {
    let mut world = HittableList::new();
    perlin_ground_and_sphere(&mut world, 4.0, rng)?;

    let light: Arc<dyn Material> = Arc::new(DiffuseLight::from_color(Color::splat(4.0)));
    world.add(Box::new(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, Arc::clone(&light))?));
    world.add(Box::new(Quad::new(
        Vec3::new(3.0, 1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        light,
    )));

    let camera = camera(Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0), 20.0);
    Ok(Scene::new(world, camera, BLACK, 16.0 / 9.0))
}

/// Unit-scale box, spun about Y and moved into place.
fn placed_box(size: Vec3, degrees: f32, offset: Vec3, material: Arc<dyn Material>) -> Box<dyn Hittable> {
    let sides = quad_box(Vec3::ZERO, size, material);
    let rotated = RotateY::new(Box::new(sides), degrees);
    Box::new(Translate::new(Box::new(rotated), offset))
}

fn cornell_box(smoke: bool) -> Result<Scene> {
    let mut world = HittableList::new();

    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lambertian(Color::splat(0.73));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::from_color(Color::splat(15.0)));

    let x = Vec3::new(555.0, 0.0, 0.0);
    let y = Vec3::new(0.0, 555.0, 0.0);
    let z = Vec3::new(0.0, 0.0, 555.0);

    world.add(Box::new(Quad::new(x, y, z, green)));
    world.add(Box::new(Quad::new(Vec3::ZERO, y, z, red)));
    world.add(Box::new(Quad::new(
        Vec3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        light,
    )));
    world.add(Box::new(Quad::new(Vec3::ZERO, x, z, Arc::clone(&white))));
    world.add(Box::new(Quad::new(Vec3::splat(555.0), -x, -z, Arc::clone(&white))));
    world.add(Box::new(Quad::new(z, x, y, Arc::clone(&white))));

    let tall = placed_box(
        Vec3::new(165.0, 330.0, 165.0),
        15.0,
        Vec3::new(265.0, 0.0, 295.0),
        Arc::clone(&white),
    );
    let short = placed_box(Vec3::splat(165.0), -18.0, Vec3::new(130.0, 0.0, 65.0), white);

    if smoke {
        world.add(Box::new(ConstantMedium::new(tall, 0.01, Color::ZERO)?));
        world.add(Box::new(ConstantMedium::new(short, 0.01, Color::ONE)?));
    } else {
        world.add(tall);
        world.add(short);
    }

    let camera = camera(Vec3::new(278.0, 278.0, -800.0), Vec3::new(278.0, 278.0, 0.0), 40.0);
    Ok(Scene::new(world, camera, BLACK, 1.0))
}

fn earth(path: &Path) -> Result<Scene> {
    let texture = ImageTexture::load(path)
        .with_context(|| format!("Failed to load texture {}", path.display()))?;

    let mut world = HittableList::new();
    let surface = Arc::new(Lambertian::new(Arc::new(texture)));
    world.add(Box::new(Sphere::new(Vec3::ZERO, 2.0, surface)?));

    let camera = camera(Vec3::new(0.0, 0.0, 12.0), Vec3::ZERO, 20.0);
    Ok(Scene::new(world, camera, SKY, 16.0 / 9.0))
}
