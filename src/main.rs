extern crate env_logger;
extern crate piston_window;
#[macro_use] extern crate log;
#[macro_use] extern crate clap;

use std::{fmt, fs, io, process};
use std::str::FromStr;

use clap::Arg;

mod bounds;
mod common;
mod contour;
mod parse;
mod plot;
mod window;

use bounds::EmptyInputError;
use common::{Segment, PointSequence};
use contour::ChainError;
use parse::ParseError;
use plot::{Color, Figure, PlotConfig};
use window::PistonError;

fn main() {
    env_logger::init();
    match run() {
        Ok(()) =>
            info!("graceful shutdown"),
        Err(e) => {
            error!("fatal error: {:?}", e);
            process::exit(1);
        },
    }
}

#[derive(Debug)]
enum Error {
    Args(clap::Error),
    UnknownColor(String),
    ReadInput { file: String, error: io::Error, },
    Parse(ParseError),
    Chain(ChainError),
    Bounds(EmptyInputError),
    Piston(PistonError),
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum InputFormat {
    Segments,
    Points,
    Records,
}

impl InputFormat {
    fn sample(&self) -> &'static str {
        match self {
            InputFormat::Segments =>
                include_str!("../demos/segments.txt"),
            InputFormat::Points =>
                include_str!("../demos/contours.txt"),
            InputFormat::Records =>
                include_str!("../demos/records.txt"),
        }
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<InputFormat, String> {
        match s {
            "segments" =>
                Ok(InputFormat::Segments),
            "points" =>
                Ok(InputFormat::Points),
            "records" =>
                Ok(InputFormat::Records),
            other =>
                Err(format!("unknown input format `{}`", other)),
        }
    }
}

enum Geometry {
    Segments(Vec<Segment>),
    Sequences(Vec<PointSequence>),
}

impl Geometry {
    fn figure(&self, config: &PlotConfig) -> Result<Figure, EmptyInputError> {
        match self {
            Geometry::Segments(segments) =>
                Figure::of_segments(segments, config),
            Geometry::Sequences(sequences) =>
                Figure::of_sequences(sequences, config),
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Geometry::Segments(segments) =>
                segments.iter().try_for_each(|segment| writeln!(f, "Line: {}", segment)),
            Geometry::Sequences(sequences) =>
                sequences.iter().try_for_each(|sequence| writeln!(f, "{}", sequence)),
        }
    }
}

fn run() -> Result<(), Error> {
    let matches = app_from_crate!()
        .arg(Arg::with_name("input")
             .short("i")
             .long("input")
             .value_name("FILE")
             .help("Text file with geometry to plot (a built-in sample is used otherwise)")
             .takes_value(true))
        .arg(Arg::with_name("format")
             .short("f")
             .long("format")
             .value_name("FORMAT")
             .help("Input grammar: `Line: x1, y1 -> x2, y2` segments, `(x, y) ...` point lines or bare `x1, y1 -> x2, y2` records")
             .possible_values(&["segments", "points", "records"])
             .default_value("points")
             .takes_value(true))
        .arg(Arg::with_name("chain")
             .long("chain")
             .help("Join segments sharing endpoints into closed contours"))
        .arg(Arg::with_name("close-loop")
             .long("close-loop")
             .help("Repeat the first point of every sequence at its end"))
        .arg(Arg::with_name("tile")
             .long("tile")
             .help("Draw every sequence in its own subplot next to the combined one"))
        .arg(Arg::with_name("color")
             .short("c")
             .long("color")
             .value_name("NAME")
             .help("Single color for every series (name, one letter abbreviation or #rrggbb)")
             .takes_value(true))
        .arg(Arg::with_name("assets-dir")
             .short("a")
             .long("assets-dir")
             .value_name("DIR")
             .help("Graphics resources directory")
             .default_value("./assets")
             .takes_value(true))
        .arg(Arg::with_name("print")
             .long("print")
             .help("Print parsed geometry instead of opening a window"))
        .get_matches();

    let format = value_t!(matches, "format", InputFormat)
        .map_err(Error::Args)?;
    let assets_dir = matches.value_of("assets-dir")
        .unwrap_or("./assets");
    let color = matches.value_of("color")
        .map(|name| Color::named(name).ok_or_else(|| Error::UnknownColor(name.to_string())))
        .transpose()?;
    let config = PlotConfig {
        close_loop: matches.is_present("close-loop"),
        color,
        tile_subplots: matches.is_present("tile"),
    };

    let (source, text) = match matches.value_of("input") {
        Some(file) => {
            let text = fs::read_to_string(file)
                .map_err(|error| Error::ReadInput { file: file.to_string(), error, })?;
            (file.to_string(), text)
        },
        None =>
            (format!("built-in {:?} sample", format), format.sample().to_string()),
    };

    let geometry = match format {
        InputFormat::Segments =>
            Geometry::Segments(parse::parse_segments(&text).map_err(Error::Parse)?),
        InputFormat::Records =>
            Geometry::Segments(parse::parse_segment_records(&text).map_err(Error::Parse)?),
        InputFormat::Points =>
            Geometry::Sequences(parse::parse_point_lines(&text).map_err(Error::Parse)?),
    };
    let geometry = match geometry {
        Geometry::Segments(ref segments) if matches.is_present("chain") => {
            let contours = contour::chain_contours(segments).map_err(Error::Chain)?;
            info!("{}: {} segments chained into {} contour(s)", source, segments.len(), contours.len());
            Geometry::Sequences(contours)
        },
        Geometry::Segments(segments) => {
            info!("{}: {} segments", source, segments.len());
            Geometry::Segments(segments)
        },
        Geometry::Sequences(sequences) => {
            if matches.is_present("chain") {
                warn!("--chain only applies to segment input, ignored");
            }
            let empty = sequences.iter().filter(|sequence| sequence.is_empty()).count();
            if empty > 0 {
                warn!("{}: {} sequence(s) without points, nothing to draw for them", source, empty);
            }
            info!(
                "{}: {} sequence(s), {} points",
                source,
                sequences.len(),
                sequences.iter().map(PointSequence::len).sum::<usize>(),
            );
            Geometry::Sequences(sequences)
        },
    };

    if matches.is_present("print") {
        print!("{}", geometry);
        return Ok(());
    }

    let figure = geometry.figure(&config).map_err(Error::Bounds)?;
    window::show("Contour plot", assets_dir, config, figure, |config| geometry.figure(config))
        .map_err(Error::Piston)
}
