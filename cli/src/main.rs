use clap::Parser;
use graphviz_rust::cmd::{CommandArg, Format};
use graphviz_rust::exec_dot;
use log::info;
use profilegen::{Compiler, FileStatus, ProfileConfig, SourceTable};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Path to the application profile table (csv, tsv, xlsx, xls or ods)
    #[arg(short, long, value_name = "FILE", default_value = "application_profile.csv")]
    input: PathBuf,

    /// Path to a TOML profile configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Namespace of the local terms, overriding the configuration
    #[arg(long, value_name = "URI")]
    base_ns: Option<String>,

    /// Prefix bound to the base namespace, overriding the configuration
    #[arg(long, value_name = "PREFIX")]
    base_prefix: Option<String>,

    /// Emit SKOS concept schemes for allowed values
    #[arg(long)]
    add_codelists: bool,

    /// Annotate mapped external classes with an owl:Class block
    #[arg(long)]
    emit_external_class_blocks: bool,
}

#[derive(Parser, Debug)]
struct OutputArgs {
    /// Path of the ontology extension
    #[arg(long, value_name = "FILE", default_value = "ontology.ttl")]
    onto: PathBuf,

    /// Path of the SHACL shapes
    #[arg(long, value_name = "FILE", default_value = "shapes.ttl")]
    shacl: PathBuf,
}

#[derive(Parser)]
struct BuildArgs {
    #[clap(flatten)]
    common: CommonArgs,
    #[clap(flatten)]
    output: OutputArgs,
}

#[derive(Parser)]
struct CheckArgs {
    #[clap(flatten)]
    common: CommonArgs,
    #[clap(flatten)]
    output: OutputArgs,
}

#[derive(Parser)]
struct GraphvizArgs {
    #[clap(flatten)]
    common: CommonArgs,
}

#[derive(Parser)]
struct PdfArgs {
    #[clap(flatten)]
    common: CommonArgs,

    /// Path to the output PDF file
    #[arg(short, long, value_name = "FILE")]
    output_file: PathBuf,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Compile the profile table and write the ontology and shapes
    Build(BuildArgs),
    /// Fail if the ontology or shapes on disk are missing or out of date
    Check(CheckArgs),
    /// Output the Graphviz DOT string of the profile
    Graphviz(GraphvizArgs),
    /// Generate a PDF of the profile using Graphviz
    Pdf(PdfArgs),
}

fn get_compiler(common: &CommonArgs) -> Result<Compiler, Box<dyn Error>> {
    let mut config = match &common.config {
        Some(path) => ProfileConfig::from_file(path)?,
        None => ProfileConfig::default(),
    };
    if let Some(base_ns) = &common.base_ns {
        config.base_ns = base_ns.clone();
    }
    if let Some(base_prefix) = &common.base_prefix {
        config.base_prefix = base_prefix.clone();
    }
    config.add_codelists |= common.add_codelists;
    config.emit_external_class_blocks |= common.emit_external_class_blocks;
    Ok(Compiler::new(config)?)
}

fn to_dot(common: &CommonArgs) -> Result<String, Box<dyn Error>> {
    let compiler = get_compiler(common)?;
    let table = SourceTable::from_path(&common.input)?;
    let profile = compiler.parse(&table)?;
    Ok(compiler.to_graphviz(&profile))
}

fn run(command: Commands) -> Result<ExitCode, Box<dyn Error>> {
    match command {
        Commands::Build(args) => {
            let compiler = get_compiler(&args.common)?;
            let artifacts = compiler.compile_file(&args.common.input)?;
            artifacts.write(&args.output.onto, &args.output.shacl)?;
            println!(
                "[OK] {} -> {}, {}",
                args.common.input.display(),
                args.output.onto.display(),
                args.output.shacl.display()
            );
        }
        Commands::Check(args) => {
            let compiler = get_compiler(&args.common)?;
            let artifacts = compiler.compile_file(&args.common.input)?;
            let (onto, shacl) = artifacts.compare(&args.output.onto, &args.output.shacl)?;
            let mut current = true;
            for (path, status) in [(&args.output.onto, onto), (&args.output.shacl, shacl)] {
                let tag = if status.is_current() { "OK" } else { "FAIL" };
                println!("[{}] {}: {}", tag, path.display(), status);
                current &= status.is_current();
                if status == FileStatus::Reformatted {
                    info!("{} differs only in layout; rebuild to normalise it", path.display());
                }
            }
            if !current {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Graphviz(args) => {
            println!("{}", to_dot(&args.common)?);
        }
        Commands::Pdf(args) => {
            let dot_string = to_dot(&args.common)?;

            let output_file_path_str = args
                .output_file
                .to_str()
                .ok_or("Invalid output file path")?;

            let cmd_args = vec![
                CommandArg::Format(Format::Pdf),
                CommandArg::Output(output_file_path_str.to_string()),
            ];

            exec_dot(dot_string, cmd_args)
                .map_err(|e| format!("Graphviz execution error: {}", e))?;

            println!("PDF generated at: {}", args.output_file.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            ExitCode::FAILURE
        }
    }
}
