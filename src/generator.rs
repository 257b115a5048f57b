//! The generation engine: parsing, customizations, code generation and
//! persistence, run as one synchronous pipeline.

use std::io;
use std::path::PathBuf;

use url::Url;

use crate::bindings::{self, Customizations};
use crate::codegen::{self, Config, Style, STYLE_DEFAULT};
use crate::writer::{CodeWriter, FileWriter};
use crate::{Error, Location};

/// Everything a generation run needs, assembled with chained setters.
pub struct Parameters {
    root_dir: Option<Url>,
    writer: Option<Box<dyn CodeWriter>>,
    package: String,
    auto_package: bool,
    customizations: Vec<PathBuf>,
    binding_args: Vec<String>,
    generation_style: String,
}

impl Default for Parameters {
    fn default() -> Parameters {
        Parameters {
            root_dir: None,
            writer: None,
            package: String::new(),
            auto_package: false,
            customizations: Vec::new(),
            binding_args: Vec::new(),
            generation_style: STYLE_DEFAULT.to_string(),
        }
    }
}

impl Parameters {
    pub fn new() -> Parameters {
        Parameters::default()
    }

    /// `file:` URL of the directory generated files are rooted at. Used to
    /// derive the default sink when no writer is set explicitly.
    pub fn root_dir(mut self, url: Url) -> Parameters {
        self.root_dir = Some(url);
        self
    }

    pub fn writer(mut self, writer: Box<dyn CodeWriter>) -> Parameters {
        self.writer = Some(writer);
        self
    }

    pub fn package(mut self, package: &str) -> Parameters {
        self.package = package.to_string();
        self
    }

    pub fn auto_package(mut self, auto_package: bool) -> Parameters {
        self.auto_package = auto_package;
        self
    }

    pub fn customizations(mut self, files: Vec<PathBuf>) -> Parameters {
        self.customizations = files;
        self
    }

    pub fn binding_args(mut self, args: Vec<String>) -> Parameters {
        self.binding_args = args;
        self
    }

    pub fn generation_style(mut self, style: &str) -> Parameters {
        self.generation_style = style.to_string();
        self
    }
}

pub struct Generator {
    params: Parameters,
}

impl Generator {
    pub fn new(params: Parameters) -> Generator {
        Generator { params }
    }

    /// Run the full pipeline for a resolved description location, once.
    pub fn process(&mut self, location: &Location) -> Result<(), Error> {
        let url = match location {
            Location::Local(url) => url,
            Location::Remote(url) => {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::Unsupported,
                    format!("retrieving remote descriptions is not supported: {}", url),
                )));
            }
        };
        let path = url.to_file_path().map_err(|_| {
            Error::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a local file URL: {}", url),
            ))
        })?;

        log::info!("reading description from {}", path.display());
        let app = crate::parse_file(&path)?;

        let mut customizations = Customizations::default();
        for file in &self.params.customizations {
            customizations.merge(bindings::load_file(file)?);
        }
        customizations.apply_arguments(&self.params.binding_args)?;

        let config = Config {
            package: self.params.package.clone(),
            auto_package: self.params.auto_package,
            style: Style::from_name(&self.params.generation_style),
            customizations,
        };
        let files = codegen::generate(&app, &config)?;

        let mut default_writer;
        let writer: &mut dyn CodeWriter = match self.params.writer.as_mut() {
            Some(writer) => writer.as_mut(),
            None => {
                let root = self.params.root_dir.as_ref().ok_or_else(|| {
                    Error::Io(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "neither a writer nor an output root was configured",
                    ))
                })?;
                let root = root.to_file_path().map_err(|_| {
                    Error::Io(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("output root is not a local directory URL: {}", root),
                    ))
                })?;
                default_writer = FileWriter::new(root);
                &mut default_writer
            }
        };

        for file in &files {
            writer.write(&file.path, &file.source)?;
        }
        log::info!(
            "generated {} file(s) for package `{}`",
            files.len(),
            self.params.package
        );
        Ok(())
    }
}
