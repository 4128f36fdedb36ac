//! Simple path tracer example.
//!
//! Renders a small scene of spheres in parallel and saves it in PPM format.

use ember_renderer::{
    render_parallel, BvhNode, CancelToken, Camera, Color, Dielectric, Hittable, Lambertian, Material, Metal,
    RenderConfig, Sphere, Vec3,
};
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    println!("Ember Path Tracer - Simple Example");
    println!("==================================");

    // Build the scene
    let start = std::time::Instant::now();
    let world = build_scene()?;
    println!("Scene built in {:?}", start.elapsed());

    // Set up camera
    let mut camera = Camera::new()
        .with_resolution(400, 225)
        .with_position(
            Vec3::new(13.0, 2.0, 3.0), // look_from
            Vec3::new(0.0, 0.0, 0.0),  // look_at
            Vec3::new(0.0, 1.0, 0.0),  // vup
        )
        .with_lens(20.0, 0.6, 10.0);
    camera.initialize()?;

    // Render configuration
    let config = RenderConfig {
        samples_per_pixel: 32,
        max_depth: 10,
        ..Default::default()
    };

    let output = render_parallel(&camera, &world, &config, &CancelToken::new())?;
    println!(
        "Rendered {}/{} buckets",
        output.buckets_done, output.buckets_total
    );

    // Save as PPM
    let filename = "output.ppm";
    output.image.write_ppm(BufWriter::new(File::create(filename)?))?;
    println!("Saved to {}", filename);

    Ok(())
}

fn build_scene() -> Result<BvhNode, Box<dyn Error>> {
    let mut objects: Vec<Box<dyn Hittable>> = Vec::new();

    let ground: Arc<dyn Material> = Arc::new(Lambertian::from_color(Color::new(0.5, 0.5, 0.5)));
    objects.push(Box::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground)?));

    // Three main spheres
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    let diffuse: Arc<dyn Material> = Arc::new(Lambertian::from_color(Color::new(0.4, 0.2, 0.1)));
    let metal: Arc<dyn Material> = Arc::new(Metal::from_color(Color::new(0.7, 0.6, 0.5), 0.0));

    objects.push(Box::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass)?));
    objects.push(Box::new(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, diffuse)?));
    objects.push(Box::new(Sphere::new(Vec3::new(4.0, 1.0, 0.0), 1.0, metal)?));

    // A ring of small spheres
    for i in 0..12 {
        let angle = i as f32 / 12.0 * std::f32::consts::TAU;
        let center = Vec3::new(6.0 * angle.cos(), 0.2, 6.0 * angle.sin());
        let material: Arc<dyn Material> = if i % 2 == 0 {
            Arc::new(Lambertian::from_color(Color::new(0.2 + 0.05 * i as f32, 0.3, 0.6)))
        } else {
            Arc::new(Metal::from_color(Color::splat(0.8), 0.1 * i as f32 / 12.0))
        };
        objects.push(Box::new(Sphere::new(center, 0.2, material)?));
    }

    Ok(BvhNode::new(objects))
}
