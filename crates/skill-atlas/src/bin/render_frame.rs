//! Render one atlas frame through the reference fragment stage.
//!
//! Useful for checking what a skill material will show without starting the
//! game, and for dumping the WGSL the client registers.
//!
//! Run: `cargo run -p skill-atlas --features tools --bin render_frame -- <atlas.png> <frame> <out.png>`
//!
//! Options:
//! - `--grid CxR`: grid layout (default 5x5)
//! - `--size N`: output size in pixels (default: one tile)
//! - `--address clamp|repeat|mirror`: sampler addressing (default clamp)
//! - `--filter nearest|linear`: sampler filtering (default linear)
//! - `--wrapped`: wrap the transform uniform in a struct
//! - `--print-wgsl [--standalone]`: print the shader source and exit

use std::env;
use std::process;

use glam::UVec2;
use image::RgbaImage;
use skill_atlas::texture::to_rgba8;
use skill_atlas::{
    AddressMode, AtlasGrid, AtlasTexture, BindingShape, FilterMode, FragmentShader, Sampler,
    ShaderTarget, encode_uniform,
};

struct Args {
    atlas: String,
    frame: usize,
    output: String,
    grid: (u32, u32),
    size: Option<u32>,
    address: AddressMode,
    filter: FilterMode,
    wrapped: bool,
    print_wgsl: bool,
    standalone: bool,
}

fn usage() -> ! {
    eprintln!(
        "usage: render_frame <atlas.png> <frame> <out.png> [--grid CxR] [--size N] \
         [--address clamp|repeat|mirror] [--filter nearest|linear] [--wrapped]\n       \
         render_frame --print-wgsl [--wrapped] [--standalone]"
    );
    process::exit(1);
}

fn parse_grid(value: &str) -> Option<(u32, u32)> {
    let (columns, rows) = value.split_once('x')?;
    Some((columns.parse().ok()?, rows.parse().ok()?))
}

fn parse_args() -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut args = Args {
        atlas: String::new(),
        frame: 0,
        output: String::new(),
        grid: (5, 5),
        size: None,
        address: AddressMode::ClampToEdge,
        filter: FilterMode::Linear,
        wrapped: false,
        print_wgsl: false,
        standalone: false,
    };

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--grid" => {
                let value = iter.next().ok_or("--grid needs a value")?;
                args.grid = parse_grid(&value).ok_or(format!("bad grid {value:?}"))?;
            }
            "--size" => {
                let value = iter.next().ok_or("--size needs a value")?;
                args.size = Some(value.parse().map_err(|_| format!("bad size {value:?}"))?);
            }
            "--address" => {
                let value = iter.next().ok_or("--address needs a value")?;
                args.address =
                    AddressMode::from_name(&value).ok_or(format!("bad address mode {value:?}"))?;
            }
            "--filter" => {
                let value = iter.next().ok_or("--filter needs a value")?;
                args.filter =
                    FilterMode::from_name(&value).ok_or(format!("bad filter {value:?}"))?;
            }
            "--wrapped" => args.wrapped = true,
            "--print-wgsl" => args.print_wgsl = true,
            "--standalone" => args.standalone = true,
            flag if flag.starts_with("--") => return Err(format!("unknown flag {flag}")),
            _ => positional.push(arg),
        }
    }

    if args.print_wgsl {
        return Ok(args);
    }

    let [atlas, frame, output] = <[String; 3]>::try_from(positional)
        .map_err(|_| "expected <atlas.png> <frame> <out.png>".to_owned())?;
    args.frame = frame
        .parse()
        .map_err(|_| format!("bad frame index {frame:?}"))?;
    args.atlas = atlas;
    args.output = output;
    Ok(args)
}

fn main() {
    tracing_subscriber::fmt::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            usage();
        }
    };

    if let Err(e) = run(&args) {
        eprintln!("render_frame failed: {e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let shape = if args.wrapped {
        BindingShape::wrapped()
    } else {
        BindingShape::bare()
    };
    let shader = FragmentShader::new(shape, Sampler::new(args.address, args.filter));

    if args.print_wgsl {
        let target = if args.standalone {
            ShaderTarget::standalone()
        } else {
            ShaderTarget::Bevy
        };
        print!("{}", shader.source(target)?);
        return Ok(());
    }

    let texture = AtlasTexture::open(&args.atlas)?;
    let (columns, rows) = args.grid;
    let tile = texture.size() / UVec2::new(columns.max(1), rows.max(1));
    let grid = AtlasGrid::from_grid(tile, columns, rows, None, None)?;
    let transform = grid.frame_transform(args.frame)?;
    tracing::info!(
        "Frame {} of {}: offset={} scale={}",
        args.frame,
        grid.frame_count(),
        transform.offset,
        transform.scale
    );

    let size = args.size.unwrap_or(tile.x.max(tile.y));
    let uniform = encode_uniform(transform);
    let pixels = shader.render(size, size, bytemuck::bytes_of(&uniform), &texture)?;

    let mut image = RgbaImage::new(size, size);
    for (pixel, color) in image.pixels_mut().zip(pixels) {
        *pixel = to_rgba8(color);
    }
    image.save(&args.output)?;
    println!("Wrote {}x{} frame to {}", size, size, args.output);

    Ok(())
}
