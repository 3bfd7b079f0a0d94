// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate failure;
extern crate juliaset;
extern crate num;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use failure::{format_err, Error};
use num::Complex;
use std::str::FromStr;

use juliaset::config::DEFAULT_EXPRESSION;
use juliaset::{generate_swatch_image, write_image, ColorMap, RenderConfig};

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

fn validate_float(s: &str, positive: bool, err: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(x) if x.is_finite() && (!positive || x > 0.0) => Ok(()),
        _ => Err(err.to_string()),
    }
}

fn validate_colormap(s: &str) -> Result<(), String> {
    ColorMap::from_str(s)
        .map(|_| ())
        .map_err(|e| format!("{}; run `julia colormaps` to list them", e))
}

const OUTPUT: &str = "output";
const FUNCTION: &str = "function";
const CENTER: &str = "center";
const RANGE: &str = "range";
const SIZE: &str = "size";
const ITERATIONS: &str = "iterations";
const RADIUS: &str = "radius";
const COLORMAP: &str = "colormap";
const THREADS: &str = "threads";
const MIN: &str = "min";
const MAX: &str = "max";
const WIDTH: &str = "width";
const ROW_HEIGHT: &str = "row-height";
const COUNT: &str = "count";

const MAX_THREADS: usize = 1024;

fn output_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name(OUTPUT)
        .required(true)
        .long(OUTPUT)
        .short("o")
        .takes_value(true)
        .help("Output file; the extension picks the image format")
}

fn scale_arg<'a, 'b>(name: &'a str, help: &'b str) -> Arg<'a, 'b> {
    Arg::with_name(name)
        .required(false)
        .long(name)
        .takes_value(true)
        .allow_hyphen_values(true)
        .validator(|s| validate_float(&s, false, "Could not parse color scale bound"))
        .help(help)
}

fn args<'a>() -> ArgMatches<'a> {
    App::new("julia")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Julia set renderer for arbitrary complex polynomials")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("render")
                .about("Render the Julia set of a polynomial to an image")
                .arg(output_arg())
                .arg(
                    Arg::with_name(FUNCTION)
                        .required(false)
                        .long(FUNCTION)
                        .short("f")
                        .takes_value(true)
                        .allow_hyphen_values(true)
                        .default_value(DEFAULT_EXPRESSION)
                        .help("The polynomial in z to iterate"),
                )
                .arg(
                    Arg::with_name(CENTER)
                        .required(false)
                        .long(CENTER)
                        .short("c")
                        .takes_value(true)
                        .allow_hyphen_values(true)
                        .default_value("0,0")
                        .validator(|s| {
                            validate_pair::<f64>(&s, ',', "Could not parse center point")
                        })
                        .help("Center of the view, as re,im"),
                )
                .arg(
                    Arg::with_name(RANGE)
                        .required(false)
                        .long(RANGE)
                        .short("r")
                        .takes_value(true)
                        .default_value("3")
                        .validator(|s| {
                            validate_float(&s, true, "Range must be a positive number")
                        })
                        .help("Width and height of the view on the complex plane"),
                )
                .arg(
                    Arg::with_name(SIZE)
                        .required(false)
                        .long(SIZE)
                        .short("s")
                        .takes_value(true)
                        .default_value("1080")
                        .validator(|s| {
                            validate_range(
                                &s,
                                1_usize,
                                20_000,
                                "Could not parse image size",
                                "Image size must be between 1 and 20000",
                            )
                        })
                        .help("Side of the square output image, in pixels"),
                )
                .arg(
                    Arg::with_name(ITERATIONS)
                        .required(false)
                        .long(ITERATIONS)
                        .short("i")
                        .takes_value(true)
                        .default_value("200")
                        .validator(|s| {
                            validate_range(
                                &s,
                                1_u32,
                                1_000_000,
                                "Could not parse iteration count",
                                "Iteration count must be between 1 and 1000000",
                            )
                        })
                        .help("Maximum number of iterations per pixel"),
                )
                .arg(
                    Arg::with_name(RADIUS)
                        .required(false)
                        .long(RADIUS)
                        .short("e")
                        .takes_value(true)
                        .default_value("2")
                        .validator(|s| {
                            validate_float(&s, true, "Escape radius must be a positive number")
                        })
                        .help("Escape radius"),
                )
                .arg(
                    Arg::with_name(COLORMAP)
                        .required(false)
                        .long(COLORMAP)
                        .short("m")
                        .takes_value(true)
                        .default_value("Jet")
                        .validator(|s| validate_colormap(&s))
                        .help("Colormap, by name or index"),
                )
                .arg(
                    Arg::with_name(THREADS)
                        .required(false)
                        .long(THREADS)
                        .short("t")
                        .takes_value(true)
                        .validator(move |s| {
                            validate_range(
                                &s,
                                1,
                                MAX_THREADS,
                                "Could not parse thread count",
                                &format!("Thread count must be between 1 and {}", MAX_THREADS),
                            )
                        })
                        .help("Number of threads to use in solver [default: all cores]"),
                )
                .arg(scale_arg(MIN, "Iteration count drawn at the low end of the colormap"))
                .arg(scale_arg(MAX, "Iteration count drawn at the high end of the colormap")),
        )
        .subcommand(
            SubCommand::with_name("swatch")
                .about("Draw every colormap as a horizontal band")
                .arg(output_arg())
                .arg(
                    Arg::with_name(WIDTH)
                        .required(false)
                        .long(WIDTH)
                        .short("w")
                        .takes_value(true)
                        .default_value("1000")
                        .validator(|s| {
                            validate_range(
                                &s,
                                1_usize,
                                20_000,
                                "Could not parse width",
                                "Width must be between 1 and 20000",
                            )
                        })
                        .help("Width of the image, in pixels"),
                )
                .arg(
                    Arg::with_name(ROW_HEIGHT)
                        .required(false)
                        .long(ROW_HEIGHT)
                        .takes_value(true)
                        .default_value("50")
                        .validator(|s| {
                            validate_range(
                                &s,
                                1_usize,
                                1_000,
                                "Could not parse row height",
                                "Row height must be between 1 and 1000",
                            )
                        })
                        .help("Height of each band, in pixels"),
                )
                .arg(
                    Arg::with_name(COUNT)
                        .required(false)
                        .long(COUNT)
                        .takes_value(true)
                        .default_value("19")
                        .validator(|s| {
                            validate_range(
                                &s,
                                1_usize,
                                ColorMap::ALL.len(),
                                "Could not parse colormap count",
                                "Colormap count must be between 1 and 19",
                            )
                        })
                        .help("How many colormaps to draw, in index order"),
                )
                .arg(scale_arg(MIN, "Value at the left edge").default_value("0"))
                .arg(scale_arg(MAX, "Value at the right edge").default_value("1")),
        )
        .subcommand(SubCommand::with_name("colormaps").about("List the available colormaps"))
        .get_matches()
}

fn parsed<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, Error> {
    let raw = matches
        .value_of(name)
        .ok_or_else(|| format_err!("missing --{}", name))?;
    T::from_str(raw).map_err(|_| format_err!("could not parse --{} '{}'", name, raw))
}

fn optional<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>, Error> {
    if matches.is_present(name) {
        parsed(matches, name).map(Some)
    } else {
        Ok(None)
    }
}

fn render(matches: &ArgMatches) -> Result<(), Error> {
    let output = parsed::<String>(matches, OUTPUT)?;
    let center = matches
        .value_of(CENTER)
        .and_then(parse_complex)
        .ok_or_else(|| format_err!("could not parse --{}", CENTER))?;
    let defaults = RenderConfig::default();
    let config = RenderConfig {
        expression: parsed(matches, FUNCTION)?,
        center,
        range: parsed(matches, RANGE)?,
        resolution: parsed(matches, SIZE)?,
        max_iterations: parsed(matches, ITERATIONS)?,
        escape_radius: parsed(matches, RADIUS)?,
        colormap: ColorMap::from_str(matches.value_of(COLORMAP).unwrap_or("Jet"))?,
        threads: optional(matches, THREADS)?.unwrap_or(defaults.threads),
        color_min: optional(matches, MIN)?,
        color_max: optional(matches, MAX)?,
    };

    let rendering = config.render()?;
    write_image(&rendering.image, &output)?;
    println!("f(z) = {}", rendering.canonical);
    println!("saved {}", output);
    Ok(())
}

fn swatch(matches: &ArgMatches) -> Result<(), Error> {
    let output = parsed::<String>(matches, OUTPUT)?;
    let image = generate_swatch_image(
        parsed(matches, COUNT)?,
        parsed(matches, WIDTH)?,
        parsed(matches, ROW_HEIGHT)?,
        parsed(matches, MIN)?,
        parsed(matches, MAX)?,
    )?;
    write_image(&image, &output)?;
    println!("saved {}", output);
    Ok(())
}

fn list_colormaps() {
    for map in ColorMap::ALL.iter() {
        println!("{:>2}  {}", map.index(), map);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = args();

    let outcome = match matches.subcommand() {
        ("render", Some(sub)) => render(sub),
        ("swatch", Some(sub)) => swatch(sub),
        _ => {
            list_colormaps();
            Ok(())
        }
    };

    if let Err(e) = outcome {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
