use mviz::data::DataPaths;
use std::path::PathBuf;

#[derive(Debug, Default)]
struct CliArgs {
    data_dir: Option<PathBuf>,
    stats: Option<PathBuf>,
    files: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = parse_args(std::env::args().skip(1).collect())?;

    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => mviz::config::data_root()?,
    };
    let mut paths = DataPaths::from_dir(&data_dir);
    if let Some(stats) = args.stats {
        paths.stats = stats;
    }
    if let Some(files) = args.files {
        paths.files = files;
    }

    mviz::app::run(mviz::app::AppOptions { paths })
}

fn parse_args(args: Vec<String>) -> anyhow::Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--data" => {
                index += 1;
                out.data_dir = Some(path_value(&args, index, "--data")?);
            }
            "--stats" => {
                index += 1;
                out.stats = Some(path_value(&args, index, "--stats")?);
            }
            "--files" => {
                index += 1;
                out.files = Some(path_value(&args, index, "--files")?);
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => anyhow::bail!("unknown argument {other}"),
        }
        index += 1;
    }
    Ok(out)
}

fn path_value(args: &[String], index: usize, flag: &str) -> anyhow::Result<PathBuf> {
    let Some(value) = args.get(index) else {
        anyhow::bail!("{flag} requires a path value");
    };
    if value.trim().is_empty() {
        anyhow::bail!("{flag} cannot be empty");
    }
    Ok(PathBuf::from(value.trim()))
}

fn print_help() {
    println!("mviz - music library statistics dashboard");
    println!("  --data <dir>     Directory holding stats.json and files.json (default web/data)");
    println!("  --stats <path>   Explicit path to stats.json");
    println!("  --files <path>   Explicit path to files.json");
}
