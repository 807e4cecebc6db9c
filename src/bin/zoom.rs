extern crate clap;
extern crate crossbeam;
extern crate env_logger;
extern crate log;
extern crate mandelzoom;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use crossbeam::channel;
use log::{error, info};
use mandelzoom::{
    feed, AnimationRenderer, AnimationReport, FrameRenderer, FrameSettings, PngSink, RenderError,
    RowRenderer, Zoom,
};
use num::Complex;
use std::str::FromStr;
use std::time::Instant;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_positive(
    s: &str,
    isnotanumber_err: &str,
    isnotpositive_err: &str,
) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(f) if f.is_finite() && f > 0.0 => Ok(()),
        Ok(_) => Err(isnotpositive_err.to_string()),
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CENTER: &str = "center";
const WIDTH: &str = "width";
const ZOOM: &str = "zoom";
const FRAMES: &str = "frames";
const ITERATIONS: &str = "iterations";
const BOUND: &str = "bound";
const FRAME_STRATEGY: &str = "frame-strategy";
const ROW_STRATEGY: &str = "row-strategy";
const ANIMATION: &str = "animation";
const JOBS: &str = "jobs";

fn args<'a>() -> ArgMatches<'a> {
    App::new("zoom")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Renders a zoom into the Mandelbrot set as a sequence of PNG frames")
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value(".")
                .help("Directory the frames are written to"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1920x1080")
                .validator(|s| match parse_pair::<u32>(&s, 'x') {
                    Some((w, h)) if w > 0 && h > 0 => Ok(()),
                    Some(_) => Err("Output image size must be positive".to_string()),
                    None => Err("Could not parse output image size".to_string()),
                })
                .help("Size of each frame"),
        )
        .arg(
            Arg::with_name(CENTER)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-0.746402,0.1101995")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse zoom center"))
                .help("Point of the complex plane the zoom closes in on"),
        )
        .arg(
            Arg::with_name(WIDTH)
                .long(WIDTH)
                .short("w")
                .takes_value(true)
                .default_value("1.0")
                .validator(|s| {
                    validate_positive(
                        &s,
                        "Could not parse plane width",
                        "Plane width must be positive",
                    )
                })
                .help("Width of the complex plane before the first frame"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .default_value("0.95")
                .validator(|s| {
                    validate_positive(
                        &s,
                        "Could not parse zoom factor",
                        "Zoom factor must be positive",
                    )
                })
                .help("Factor the plane width is multiplied by for every frame"),
        )
        .arg(
            Arg::with_name(FRAMES)
                .long(FRAMES)
                .short("n")
                .takes_value(true)
                .default_value("300")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        100_000,
                        "Could not parse frame count",
                        "Frame count must be between 1 and 100000",
                    )
                })
                .help("Number of frames to render"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("200")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Iteration cap per pixel"),
        )
        .arg(
            Arg::with_name(BOUND)
                .long(BOUND)
                .short("b")
                .takes_value(true)
                .default_value("10000")
                .validator(|s| {
                    validate_positive(
                        &s,
                        "Could not parse escape bound",
                        "Escape bound must be positive",
                    )
                })
                .help("Squared escape radius"),
        )
        .arg(
            Arg::with_name(FRAME_STRATEGY)
                .long(FRAME_STRATEGY)
                .short("f")
                .takes_value(true)
                .possible_values(&["serial", "parallel"])
                .default_value("serial")
                .help("Render the rows of a frame one by one or on one worker per CPU"),
        )
        .arg(
            Arg::with_name(ROW_STRATEGY)
                .long(ROW_STRATEGY)
                .short("r")
                .takes_value(true)
                .possible_values(&["serial", "parallel"])
                .default_value("serial")
                .help("Render the pixels of a row one by one or on one worker per CPU"),
        )
        .arg(
            Arg::with_name(ANIMATION)
                .long(ANIMATION)
                .short("a")
                .takes_value(true)
                .possible_values(&["serial", "concurrent"])
                .default_value("concurrent")
                .help("Render frames one by one or all at once"),
        )
        .arg(
            Arg::with_name(JOBS)
                .long(JOBS)
                .short("j")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        0,
                        usize::MAX,
                        "Could not parse job count",
                        "Job count out of range",
                    )
                })
                .help(
                    "Frames in flight for concurrent animation, 0 for no limit \
                     (default: number of CPUs)",
                ),
        )
        .get_matches()
}

fn strategies(matches: &ArgMatches) -> (FrameRenderer, AnimationRenderer) {
    let rows = match matches.value_of(ROW_STRATEGY) {
        Some("parallel") => RowRenderer::Parallel,
        _ => RowRenderer::Serial,
    };
    let frames = match matches.value_of(FRAME_STRATEGY) {
        Some("parallel") => FrameRenderer::Parallel(rows),
        _ => FrameRenderer::Serial(rows),
    };
    let animation = match matches.value_of(ANIMATION) {
        Some("serial") => AnimationRenderer::Serial,
        _ => {
            let jobs = matches
                .value_of(JOBS)
                .map(|s| usize::from_str(s).expect("Could not parse job count."))
                .unwrap_or_else(num_cpus::get);
            AnimationRenderer::Concurrent {
                in_flight: if jobs == 0 { None } else { Some(jobs) },
            }
        }
    };
    (frames, animation)
}

fn run(matches: &ArgMatches) -> Result<AnimationReport, RenderError> {
    let size =
        parse_pair(matches.value_of(SIZE).unwrap(), 'x').expect("Error parsing image dimensions");
    let center =
        parse_complex(matches.value_of(CENTER).unwrap()).expect("Error parsing zoom center");
    let width =
        f64::from_str(matches.value_of(WIDTH).unwrap()).expect("Could not parse plane width.");
    let factor =
        f64::from_str(matches.value_of(ZOOM).unwrap()).expect("Could not parse zoom factor.");
    let frames =
        usize::from_str(matches.value_of(FRAMES).unwrap()).expect("Could not parse frame count.");
    let iterations = u32::from_str(matches.value_of(ITERATIONS).unwrap())
        .expect("Could not parse iteration count.");
    let bound =
        f64::from_str(matches.value_of(BOUND).unwrap()).expect("Could not parse escape bound.");

    let template = FrameSettings::new(size, center, width, bound, iterations, "template")?;
    let zoom = Zoom::new(&template, factor, frames)?;
    let sink = PngSink::new(matches.value_of(OUTPUT).unwrap());
    let (frame_renderer, animation) = strategies(matches);
    info!(
        "{} frames of {}x{} into {} using {:?} frames and {:?} animation",
        frames,
        size.0,
        size.1,
        sink.directory().display(),
        frame_renderer,
        animation
    );

    let (sender, receiver) = channel::bounded(0);
    crossbeam::scope(|spawner| {
        spawner.spawn(move |_| feed(&sender, zoom));
        let report = animation.render(&receiver, &frame_renderer, &sink);
        // Unblocks the producer if rendering stopped early.
        drop(receiver);
        report
    })
    .map_err(|_| RenderError::TaskFailed("frame producer panicked".to_string()))?
}

fn main() {
    let before = Instant::now();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = args();
    match run(&matches) {
        Err(e) => {
            error!("Render failure: {}", e);
            std::process::exit(1);
        }
        Ok(report) => {
            info!(
                "Done in {:?}: {} of {} frames written",
                before.elapsed(),
                report.written,
                report.dispatched
            );
            if !report.is_success() {
                error!("{} frames failed", report.failures.len());
                std::process::exit(1);
            }
        }
    }
}
