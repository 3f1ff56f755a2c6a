use clap::{Arg, ArgAction, Command, value_parser};

pub const OVERLAP_CMD: &str = "intervalOverlap";

pub fn create_overlap_cli() -> Command {
    Command::new(OVERLAP_CMD)
        .about("Report query intervals that stand in a given relationship to a set of select intervals.")
        .override_usage(format!("{OVERLAP_CMD} [OPTIONS] <select.file> <in.file> <out.file>"))
        .arg(
            Arg::new("select")
                .value_name("select.file")
                .help("Intervals to build the search tree from (.bed, .axt, .vcf, .sam, .chain, optionally .gz)")
                .required_unless_present("printRelationships"),
        )
        .arg(
            Arg::new("input")
                .value_name("in.file")
                .help("Query intervals, streamed against the tree")
                .required_unless_present("printRelationships"),
        )
        .arg(
            Arg::new("output")
                .value_name("out.file")
                .help("Where to write query records; '-' for stdout, a .gz suffix compresses")
                .required_unless_present("printRelationships"),
        )
        .arg(
            Arg::new("nonOverlap")
                .long("nonOverlap")
                .help("Output only query records with no match")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .value_name("N")
                .help("Number of query workers")
                .value_parser(value_parser!(usize))
                .default_value("1"),
        )
        .arg(
            Arg::new("aggregate")
                .long("aggregate")
                .help("Merge overlapping select intervals into clusters before building the tree")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("relationship")
                .long("relationship")
                .value_name("R")
                .help("One of o, oi, d, di, m, mi, s, si, f, fi, gt, lt, e, any, within, start, end, equal")
                .default_value("any"),
        )
        .arg(
            Arg::new("mergedOutput")
                .long("mergedOutput")
                .help("Write each matching query record followed by the select records it matched")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("printRelationships")
                .long("printRelationships")
                .help("Print a diagram of all relationships and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("unordered")
                .long("unordered")
                .help("Write answers as soon as they are ready instead of in input order")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase logging (-v info, -vv debug)")
                .action(ArgAction::Count),
        )
}
