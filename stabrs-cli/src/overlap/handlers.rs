use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use stabrs_core::models::{Interval, RecordWrite};
use stabrs_core::utils::get_dynamic_writer;
use stabrs_io::{Format, Record, RecordReader};
use stabrs_overlap::{
    AnswerWriter, OutputMode, OverlapOptions, OverlapTree, PipelineStats, Relation,
    merge_into_clusters, run_pipeline,
};

/// Resolve every flag into [`OverlapOptions`]; no file is touched here.
pub fn options_from_matches(matches: &ArgMatches) -> Result<OverlapOptions> {
    let relation = match matches.get_one::<String>("relationship") {
        Some(code) => Relation::from_str(code)?,
        None => Relation::Any,
    };
    let output_mode =
        OutputMode::from_flags(matches.get_flag("mergedOutput"), matches.get_flag("nonOverlap"))?;
    let threads = matches.get_one::<usize>("threads").copied().unwrap_or(1);

    let options = OverlapOptions {
        relation,
        output_mode,
        threads,
        aggregate: matches.get_flag("aggregate"),
        preserve_order: !matches.get_flag("unordered"),
        ..Default::default()
    };
    options.validate()?;
    Ok(options)
}

fn required_path<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a Path> {
    matches
        .get_one::<String>(name)
        .map(Path::new)
        .with_context(|| format!("A path to the {name} file is required."))
}

pub fn run_overlap(matches: &ArgMatches) -> Result<()> {
    if matches.get_flag("printRelationships") {
        print!("{}", Relation::diagram());
        return Ok(());
    }

    let options = options_from_matches(matches)?;

    let select = required_path(matches, "select")?;
    let input = required_path(matches, "input")?;
    let output = required_path(matches, "output")?;

    // both formats must be known before anything is read
    let select_format = Format::from_path(select)?;
    let input_format = Format::from_path(input)?;
    info!(
        "Select file {} ({}), query file {} ({})",
        select.display(),
        select_format,
        input.display(),
        input_format
    );

    let records: Vec<Record> = RecordReader::from_path(select)?
        .collect::<Result<_, _>>()
        .with_context(|| format!("Failed to read select file {}", select.display()))?;
    info!("Read {} select records", records.len());

    let stats = if options.aggregate {
        let targets = merge_into_clusters(records);
        let clusters = targets.iter().filter(|t| t.is_aggregate()).count();
        info!(
            "Aggregated select records into {} targets ({} clusters)",
            targets.len(),
            clusters
        );
        query_and_write(&build_tree(targets), input, output, &options)?
    } else {
        query_and_write(&build_tree(records), input, output, &options)?
    };

    info!(
        "Wrote results for {} of {} queries to {}",
        match options.output_mode {
            OutputMode::NonOverlapping => stats.queries - stats.queries_with_matches,
            _ => stats.queries_with_matches,
        },
        stats.queries,
        output.display()
    );

    Ok(())
}

fn build_tree<T: Interval>(intervals: Vec<T>) -> OverlapTree<T> {
    let tree = OverlapTree::build(intervals);
    info!(
        "Built tree: {} chromosomes, {} nodes, {} intervals",
        tree.chrom_count(),
        tree.node_count(),
        tree.len()
    );
    tree
}

fn query_and_write<T>(
    tree: &OverlapTree<T>,
    input: &Path,
    output: &Path,
    options: &OverlapOptions,
) -> Result<PipelineStats>
where
    T: Interval + RecordWrite + Sync,
{
    let queries = RecordReader::from_path(input)
        .with_context(|| format!("Failed to open query file {}", input.display()))?;

    let mut writer = get_dynamic_writer(output)
        .with_context(|| format!("Failed to create output file {}", output.display()))?;
    queries.write_header(&mut writer)?;

    let mut answers = AnswerWriter::new(writer, options.output_mode);
    let stats = run_pipeline(tree, queries, options, |answer| answers.write_answer(&answer))
        .with_context(|| format!("Failed to query {}", input.display()))?;

    answers
        .into_inner()
        .finish()
        .with_context(|| format!("Failed to finish writing {}", output.display()))?;

    Ok(stats)
}
