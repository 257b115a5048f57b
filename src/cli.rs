//! Command-line front end: option scanning, input validation, location
//! resolution, and hand-off to the generation engine.
//!
//! The option grammar is position-sensitive. The final token is always the
//! description location, never a flag or a flag value; every other
//! recognized flag consumes itself plus exactly one value token, except the
//! bare `-a` switch. A consumed value token is taken verbatim and never
//! re-examined, so values that look like flags are fine.

use std::path::{Path, PathBuf};

use url::Url;

use crate::codegen::STYLE_DEFAULT;
use crate::generator::{Generator, Parameters};
use crate::writer::FileWriter;
use crate::{Error, Location};

pub const USAGE: &str = "\
Usage: wadlgen -p <package> -o <directory> [-s <style>] [-c <customization>]... [-a] [-xjcArgument <argument>]... <location>

  -p <package>             package for the generated code, e.g. api.client
  -o <directory>           existing directory generated files are written to
  -s <style>               generation style: blocking (default) or async
  -c <customization>       schema-binding customization file; repeatable
  -a                       derive sub-packages from the resource structure
  -xjcArgument <argument>  extra argument for the schema-binding step; repeatable
  <location>               path or URL of the WADL description";

fn print_usage() {
    eprintln!("{}", USAGE);
}

/// Options frozen once scanning and the required-field check succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub output_dir: PathBuf,
    pub package: String,
    pub generation_style: String,
    pub auto_package: bool,
    pub customizations: Vec<PathBuf>,
    pub binding_args: Vec<String>,
    pub input: String,
}

/// Result of scanning the raw argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scan {
    Options(Options),
    /// An unrecognized token before the final position; scanning stopped
    /// right there.
    UnknownOption(String),
    /// Too few tokens, a trailing flag that swallowed the location, or a
    /// missing required option.
    Incomplete,
}

pub fn scan_args(args: &[String]) -> Scan {
    let mut output_dir: Option<PathBuf> = None;
    let mut package: Option<String> = None;
    let mut generation_style = STYLE_DEFAULT.to_string();
    let mut auto_package = false;
    let mut customizations: Vec<PathBuf> = Vec::new();
    let mut binding_args: Vec<String> = Vec::new();

    let mut i = 0;
    while i + 1 < args.len() {
        match args[i].as_str() {
            "-o" => {
                output_dir = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "-p" => {
                package = Some(args[i + 1].clone());
                i += 2;
            }
            "-s" => {
                generation_style = args[i + 1].clone();
                i += 2;
            }
            "-c" => {
                customizations.push(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "-a" => {
                auto_package = true;
                i += 1;
            }
            "-xjcArgument" => {
                binding_args.push(args[i + 1].clone());
                i += 2;
            }
            unknown => return Scan::UnknownOption(unknown.to_string()),
        }
    }

    // A trailing value-taking flag can swallow the final token; the cursor
    // then sits past the end and no location token is left.
    if i >= args.len() {
        return Scan::Incomplete;
    }
    let (output_dir, package) = match (output_dir, package) {
        (Some(output_dir), Some(package)) => (output_dir, package),
        _ => return Scan::Incomplete,
    };

    Scan::Options(Options {
        output_dir,
        package,
        generation_style,
        auto_package,
        customizations,
        binding_args,
        input: args[args.len() - 1].clone(),
    })
}

/// A location as classified before any filesystem checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLocation {
    /// A bare path or `file:` URL, subject to validation and normalization.
    Local(PathBuf),
    /// Any other scheme, forwarded to the engine untouched.
    Remote(Url),
}

/// Decide whether the trailing positional argument names a local file or an
/// already-schemed resource.
pub fn resolve_location(input: &str) -> Result<RawLocation, Error> {
    match Url::parse(input) {
        Ok(url) if url.scheme() == "file" => {
            let path = url
                .to_file_path()
                .unwrap_or_else(|_| PathBuf::from(url.path()));
            Ok(RawLocation::Local(path))
        }
        Ok(url) => Ok(RawLocation::Remote(url)),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Ok(RawLocation::Local(PathBuf::from(input)))
        }
        Err(err) => Err(Error::Location(err)),
    }
}

/// Rewrite a validated local path into an absolute `file:` URL.
pub fn file_url(path: &Path) -> Result<Url, Error> {
    let absolute = path.canonicalize()?;
    Url::from_file_path(&absolute).map_err(|_| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("cannot express {} as a file URL", absolute.display()),
        ))
    })
}

fn directory_url(path: &Path) -> Result<Url, Error> {
    let absolute = path.canonicalize()?;
    Url::from_directory_path(&absolute).map_err(|_| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("cannot express {} as a directory URL", absolute.display()),
        ))
    })
}

/// Print the full diagnostic chain for one of the documented failure kinds.
fn report(err: &Error) {
    eprintln!("{}", err);
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
}

/// Entry point for the command-line tool. `args` excludes the program name.
/// Returns the process exit status: 1 for filesystem validation failures,
/// 0 otherwise.
pub fn run(args: &[String]) -> i32 {
    let options = match scan_args(args) {
        Scan::Options(options) => options,
        Scan::UnknownOption(token) => {
            eprintln!("Unknown option: {}", token);
            print_usage();
            return 0;
        }
        Scan::Incomplete => {
            print_usage();
            return 0;
        }
    };

    let raw = match resolve_location(&options.input) {
        Ok(raw) => raw,
        Err(err) => {
            report(&err);
            return 0;
        }
    };

    let location = match raw {
        RawLocation::Local(path) => {
            if !path.is_file() {
                eprintln!("Not a file: {}", path.display());
                print_usage();
                return 1;
            }
            if !options.output_dir.is_dir() {
                eprintln!("Not a directory: {}", options.output_dir.display());
                print_usage();
                return 1;
            }
            for customization in &options.customizations {
                if !customization.is_file() {
                    eprintln!("Not a file: {}", customization.display());
                    print_usage();
                    return 1;
                }
            }
            match file_url(&path) {
                Ok(url) => Location::Local(url),
                Err(err) => {
                    report(&err);
                    return 0;
                }
            }
        }
        RawLocation::Remote(url) => Location::Remote(url),
    };

    let root_dir = match directory_url(&options.output_dir) {
        Ok(url) => url,
        Err(err) => {
            report(&err);
            return 0;
        }
    };

    let parameters = Parameters::new()
        .root_dir(root_dir)
        .writer(Box::new(FileWriter::new(&options.output_dir)))
        .package(&options.package)
        .auto_package(options.auto_package)
        .customizations(options.customizations)
        .binding_args(options.binding_args)
        .generation_style(&options.generation_style);

    let mut generator = Generator::new(parameters);
    match generator.process(&location) {
        Ok(()) => 0,
        Err(err) => {
            report(&err);
            0
        }
    }
}
