use clap::{App, Arg, SubCommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

//===========================================================================//

fn main() {
    env_logger::init();
    let matches = App::new("icoforge")
        .version("0.1")
        .about("Converts PNG images into ICO files")
        .subcommand(
            SubCommand::with_name("convert")
                .about("Converts PNG files into ICO files")
                .arg(
                    Arg::with_name("single")
                        .short("s")
                        .long("single")
                        .help("Emits only the single large size"),
                )
                .arg(
                    Arg::with_name("bundle")
                        .short("b")
                        .long("bundle")
                        .help("Fails unless every image converts, and \
                               writes into one timestamped directory"),
                )
                .arg(
                    Arg::with_name("output")
                        .takes_value(true)
                        .value_name("DIR")
                        .short("o")
                        .long("output")
                        .help("Sets output directory"),
                )
                .arg(
                    Arg::with_name("policy")
                        .takes_value(true)
                        .value_name("PATH")
                        .long("policy")
                        .help("Loads the size policy from a JSON file"),
                )
                .arg(
                    Arg::with_name("jobs")
                        .takes_value(true)
                        .value_name("N")
                        .short("j")
                        .long("jobs")
                        .help("Sets how many images convert at once"),
                )
                .arg(Arg::with_name("image").multiple(true).required(true)),
        )
        .subcommand(
            SubCommand::with_name("list")
                .about("Lists icons in an ICO file")
                .arg(Arg::with_name("ico").required(true)),
        )
        .get_matches();
    let result = match matches.subcommand() {
        ("convert", Some(submatches)) => convert(submatches),
        ("list", Some(submatches)) => {
            list(submatches.value_of("ico").unwrap_or_default())
        }
        _ => Err(matches.usage().to_string()),
    };
    if let Err(message) = result {
        eprintln!("error: {}", message);
        process::exit(1);
    }
}

fn convert(submatches: &clap::ArgMatches) -> Result<(), String> {
    let mut converter = icoforge::Converter::new();
    if let Some(path) = submatches.value_of("policy") {
        let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let policy: icoforge::SizePolicy =
            serde_json::from_str(&text).map_err(|e| e.to_string())?;
        converter = converter.with_policy(policy);
    }
    if let Some(jobs) = submatches.value_of("jobs") {
        let jobs = jobs.parse::<usize>().map_err(|e| e.to_string())?;
        converter = converter.with_max_parallel(jobs);
    }
    let mode = if submatches.is_present("single") {
        icoforge::Mode::SingleLarge
    } else {
        icoforge::Mode::Optimized
    };
    let mut sources = Vec::new();
    for path in submatches.values_of("image").into_iter().flatten() {
        let bytes = fs::read(path).map_err(|e| format!("{}: {}", path, e))?;
        let name = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        sources.push(icoforge::RawSource::new(name, bytes));
    }
    let out_dir = PathBuf::from(submatches.value_of("output").unwrap_or("."));
    let bundled = submatches.is_present("bundle");
    let (intent, out_dir) = if bundled {
        let archive = icoforge::archive_name_now(sources.len());
        let dir_name = archive.trim_end_matches(".zip").to_string();
        (icoforge::BatchIntent::Archive, out_dir.join(dir_name))
    } else {
        (icoforge::BatchIntent::Individual, out_dir)
    };
    let outcome = converter
        .convert_batch(&sources, mode, intent)
        .map_err(|e| e.to_string())?;
    for failure in outcome.failures() {
        if let Err(ref error) = failure.result {
            eprintln!("{}: {}", failure.name, error);
        }
    }
    let mut sink =
        icoforge::DirectorySink::create(&out_dir).map_err(|e| e.to_string())?;
    let names = icoforge::bundle(outcome.results(), &mut sink)
        .map_err(|e| e.to_string())?;
    for name in names {
        println!("Wrote {:?}", sink.root().join(name));
    }
    if outcome.failure_count() > 0 {
        return Err(format!("{} image(s) failed", outcome.failure_count()));
    }
    Ok(())
}

fn list(path: &str) -> Result<(), String> {
    let file = fs::read(path).map_err(|e| format!("{}: {}", path, e))?;
    let entries =
        icoforge::read_directory(&file).map_err(|e| e.to_string())?;
    for (index, entry) in entries.iter().enumerate() {
        let kind = if entry.is_png(&file) { "PNG" } else { "BMP" };
        println!(
            "{:5}: {}x{} {}, {} bpp, {} bytes at {}",
            index,
            entry.width,
            entry.height,
            kind,
            entry.bits_per_pixel,
            entry.data_size,
            entry.data_offset
        );
    }
    Ok(())
}

//===========================================================================//
