//! `protoc-gen-jsonschema` entry point.
//!
//! Without arguments the binary speaks the `protoc` plugin protocol: an
//! encoded `CodeGeneratorRequest` on stdin, an encoded
//! `CodeGeneratorResponse` on stdout.
//!
//! ```text
//! protoc --jsonschema_out=schemas --jsonschema_opt=allow_null_values shop.proto
//! ```
//!
//! With `--proto` or `--descriptor-set` it converts files directly and writes
//! the documents into `--out-dir`.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use protoschema::descriptor::{
    decode_code_generator_request, decode_file_descriptor_set, encode_code_generator_response,
    CodeGeneratorResponse,
};
use protoschema::{error_response, handle_request_with, Config, Options};

/// Generate JSON Schema documents from protobuf messages.
///
/// Runs as a protoc plugin when invoked without arguments.
#[derive(Parser, Debug)]
#[command(name = "protoc-gen-jsonschema", version, about, long_about = None)]
struct Cli {
    /// A `.proto` file to convert. Requires protoc.
    #[arg(long = "proto", value_name = "FILE", conflicts_with = "descriptor_set")]
    protos: Vec<PathBuf>,

    /// Directory to search for imports. Defaults to the current directory.
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    includes: Vec<PathBuf>,

    /// A pre-built FileDescriptorSet, as written by `protoc --descriptor_set_out`.
    #[arg(long, value_name = "FILE", requires = "files")]
    descriptor_set: Option<PathBuf>,

    /// Name of a unit inside the descriptor set to convert.
    #[arg(long = "file", value_name = "NAME", requires = "descriptor_set")]
    files: Vec<String>,

    /// Directory for generated documents. Falls back to `OUT_DIR`.
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Comma separated options, as passed through `--jsonschema_opt`.
    #[arg(long, value_name = "OPTS", default_value = "")]
    parameter: String,

    /// Path to the protoc executable.
    #[arg(long, value_name = "PATH")]
    protoc: Option<PathBuf>,
}

impl Cli {
    fn is_plugin(&self) -> bool {
        self.protos.is_empty() && self.descriptor_set.is_none()
    }
}

type FilterHandle = reload::Handle<EnvFilter, Registry>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    // stdout carries the plugin response, so logs go to stderr.
    let logging = init_logging();

    let result = if cli.is_plugin() {
        run_plugin(&logging)
    } else {
        let options = Options::from_parameter(&cli.parameter);
        if options.debug {
            raise_to_debug(&logging);
        }
        run_standalone(cli, options).map(|written| {
            info!("generated {} schema files", written.len());
            ExitCode::SUCCESS
        })
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() -> FilterHandle {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .without_time()
                .with_target(false),
        )
        .init();

    handle
}

fn raise_to_debug(logging: &FilterHandle) {
    if let Err(err) = logging.modify(|filter| *filter = EnvFilter::new("debug")) {
        warn!("failed to raise log level: {}", err);
    }
}

/// Answer one plugin request. A failed request still gets a response so
/// protoc can report the error; the exit status reflects the failure.
fn run_plugin(logging: &FilterHandle) -> anyhow::Result<ExitCode> {
    let mut input = Vec::new();
    io::stdin()
        .read_to_end(&mut input)
        .context("failed to read request from stdin")?;

    let (response, code) = match respond(&input, logging) {
        Ok(response) => (response, ExitCode::SUCCESS),
        Err(err) => {
            error!("{}", err);
            (error_response(&err), ExitCode::FAILURE)
        }
    };

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&encode_code_generator_response(&response))
        .context("failed to write response to stdout")?;
    stdout.flush().context("failed to flush stdout")?;

    Ok(code)
}

fn respond(input: &[u8], logging: &FilterHandle) -> Result<CodeGeneratorResponse, protoschema::Error> {
    let request = decode_code_generator_request(input)?;
    let options = Options::from_parameter(request.parameter.as_deref().unwrap_or_default());
    if options.debug {
        raise_to_debug(logging);
    }
    debug!(
        "converting {} of {} files",
        request.file_to_generate.len(),
        request.proto_file.len()
    );
    handle_request_with(&request, options)
}

fn run_standalone(cli: Cli, options: Options) -> anyhow::Result<Vec<PathBuf>> {
    let mut config = Config::new();
    config.options(options);
    if let Some(out_dir) = &cli.out_dir {
        config.out_dir(out_dir);
    }

    if let Some(path) = &cli.descriptor_set {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read descriptor set {}", path.display()))?;
        let fds = decode_file_descriptor_set(&bytes)
            .with_context(|| format!("failed to decode descriptor set {}", path.display()))?;
        return Ok(config.compile_fds(fds, &cli.files)?);
    }

    if let Some(protoc) = &cli.protoc {
        config.protoc_path(protoc);
    }
    let includes = if cli.includes.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        cli.includes
    };
    Ok(config.compile_protos(&cli.protos, &includes)?)
}
