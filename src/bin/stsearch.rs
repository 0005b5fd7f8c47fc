//! Main CLI for stsearch.
use mimalloc::MiMalloc;
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use anyhow::{bail, Context, Result};
use clap::{value_t, App, Arg, ArgGroup};
use log::info;
use serde_json::json;
use sha3::{Digest, Sha3_256};
use std::io::BufWriter;
use std::path::PathBuf;
use std::{env, fs, io, process};
use stsearch::init::{graph_matrix_from_file, MatrixKind};
use stsearch::search::{budget_from_count, enumerate, CycleCheck, SearchParams, DEFAULT_SEED};
use stsearch::stats::{JSONLWriter, SearchCounts, TSVWriter, TreeWriter};

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

fn main() -> Result<()> {
    init_logging();
    let default_seed = DEFAULT_SEED.to_string();
    let cli = App::new("stsearch")
        .version("0.1.0")
        .about("Counts spanning trees exactly (Kirchhoff's theorem) and searches for them.")
        .arg(
            Arg::with_name("graph_adjacency")
                .long("graph-adjacency")
                .takes_value(true)
                .help("The path of the graph's adjacency matrix (JSON list of rows)."),
        )
        .arg(
            Arg::with_name("graph_incidence")
                .long("graph-incidence")
                .takes_value(true)
                .help("The path of the graph's node×edge incidence matrix (JSON list of rows)."),
        )
        .group(
            ArgGroup::with_name("input")
                .args(&["graph_adjacency", "graph_incidence"])
                .required(true),
        )
        .arg(
            Arg::with_name("count")
                .long("count")
                .help("Print the number of spanning trees."),
        )
        .arg(
            Arg::with_name("trees")
                .long("trees")
                .help("Search for spanning trees and print them."),
        )
        .arg(
            Arg::with_name("rng_seed")
                .long("rng-seed")
                .takes_value(true)
                .default_value(&default_seed)
                .help("The seed of the RNG used to choose edges."),
        )
        .arg(
            Arg::with_name("budget")
                .long("budget")
                .takes_value(true)
                .help("The number of trees to search for (default: the exact count)."),
        )
        .arg(
            Arg::with_name("max_depth")
                .long("max-depth")
                .takes_value(true)
                .help("The maximum depth of the search's decision tree."),
        )
        .arg(
            Arg::with_name("cycle_check")
                .long("cycle-check")
                .takes_value(true)
                .default_value("chain-walk"),
        ) // other options: union-find
        .arg(
            Arg::with_name("writer")
                .long("writer")
                .takes_value(true)
                .default_value("jsonl"),
        ); // other options: jsonl-full, tsv

    if env::args().len() == 1 {
        cli.write_help(&mut io::stderr())?;
        eprintln!();
        process::exit(1);
    }
    let matches = cli.get_matches();

    let (input, kind) = match (
        matches.value_of("graph_adjacency"),
        matches.value_of("graph_incidence"),
    ) {
        (Some(path), None) => (path, MatrixKind::Adjacency),
        (None, Some(path)) => (path, MatrixKind::Incidence),
        _ => bail!("Exactly one of --graph-adjacency and --graph-incidence is required."),
    };
    let count_requested = matches.is_present("count");
    let trees_requested = matches.is_present("trees");
    if !count_requested && !trees_requested {
        bail!("Nothing to do: pass --count and/or --trees.");
    }
    let rng_seed = value_t!(matches.value_of("rng_seed"), u64).unwrap_or_else(|e| e.exit());
    let budget = if matches.is_present("budget") {
        Some(value_t!(matches.value_of("budget"), usize).unwrap_or_else(|e| e.exit()))
    } else {
        None
    };
    let max_depth = if matches.is_present("max_depth") {
        Some(value_t!(matches.value_of("max_depth"), usize).unwrap_or_else(|e| e.exit()))
    } else {
        None
    };
    let cycle_check = match matches.value_of("cycle_check").unwrap_or("chain-walk") {
        "chain-walk" => CycleCheck::ChainWalk,
        "union-find" => CycleCheck::UnionFind,
        bad => bail!("Parameter error: invalid cycle check '{}'", bad),
    };
    let mut writer: Box<dyn TreeWriter> = match matches.value_of("writer").unwrap_or("jsonl") {
        "jsonl" => Box::new(JSONLWriter::new(BufWriter::new(io::stdout()), false)),
        "jsonl-full" => Box::new(JSONLWriter::new(BufWriter::new(io::stdout()), true)),
        "tsv" => Box::new(TSVWriter::new(BufWriter::new(io::stdout()))),
        bad => bail!("Parameter error: invalid writer '{}'", bad),
    };

    let path = fs::canonicalize(PathBuf::from(input))
        .with_context(|| format!("Could not find {}", input))?
        .to_string_lossy()
        .into_owned();
    let graph_matrix = graph_matrix_from_file(&path, kind)?;
    let count = graph_matrix.spanning_tree_count()?.clone();
    info!("Number of spanning trees: {}", count);

    let mut graph_file = fs::File::open(&path)?;
    let mut graph_hasher = Sha3_256::new();
    io::copy(&mut graph_file, &mut graph_hasher)?;
    let graph_hash = format!("{:x}", graph_hasher.finalize());
    let mut meta = json!({
        "graph_path": path,
        "graph_sha3": graph_hash,
        "input": format!("{:?}", kind).to_lowercase(),
        "count": count_requested,
        "trees": trees_requested,
    });

    if !trees_requested {
        println!("{}", json!({ "meta": meta }));
        writer.init(graph_matrix.adjacency()?, &count)?;
        return Ok(writer.close(&SearchCounts::default())?);
    }

    let params = SearchParams {
        rng_seed: rng_seed,
        budget: budget.unwrap_or_else(|| budget_from_count(&count)),
        max_depth: max_depth,
        cycle_check: cycle_check,
    };
    if let Some(obj) = meta.as_object_mut() {
        obj.insert("rng_seed".to_string(), json!(params.rng_seed));
        obj.insert("budget".to_string(), json!(params.budget));
        obj.insert("max_depth".to_string(), json!(params.max_depth));
        obj.insert("cycle_check".to_string(), json!(format!("{:?}", cycle_check)));
    }
    println!("{}", json!({ "meta": meta }));

    writer.init(graph_matrix.adjacency()?, &count)?;
    let graph = graph_matrix.graph()?;
    let result = enumerate(&graph, &params);
    info!(
        "Found {} of {} spanning trees (budget {})",
        result.trees.len(),
        count,
        params.budget
    );
    for (index, tree) in result.trees.iter().enumerate() {
        writer.tree(index, tree)?;
    }
    writer.close(&result.counts)?;
    Ok(())
}
