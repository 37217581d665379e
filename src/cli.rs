use camino::Utf8PathBuf;

use clap::{
    builder::PossibleValue, crate_version, value_parser, Arg, ArgAction, Command, ValueEnum,
    ValueHint,
};

use crate::data::{BenchmarkKind, DEFAULT_TITLE};

impl ValueEnum for BenchmarkKind {
    fn value_variants<'a>() -> &'a [Self] {
        &[BenchmarkKind::Simple, BenchmarkKind::CentralTendency]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        let help = match self {
            BenchmarkKind::Simple => "plot every record as written by the harness",
            BenchmarkKind::CentralTendency => "plot only the `_mean` aggregates",
        };
        Some(PossibleValue::new(self.as_str()).help(help))
    }
}

pub fn clap() -> clap::Command {
    fn verbose() -> Arg {
        Arg::new("verbose")
            .help("be verbose (e.g., list every series)")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
    }

    fn quiet() -> Arg {
        Arg::new("quiet")
            .help("don't print status messages")
            .short('q')
            .long("quiet")
            .conflicts_with("verbose")
            .action(ArgAction::SetTrue)
    }

    Command::new("benchplot")
        .version(crate_version!())
        .about("Visualize google-benchmark json output")
        .args_conflicts_with_subcommands(true)
        .subcommand_negates_reqs(true)
        .arg(
            Arg::new("file")
                .help("path to file.json with benchmark data")
                .value_name("FILE")
                .required(true)
                .value_parser(value_parser!(Utf8PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("output")
                .help("place the plot into <OUTPUT> (\".png\" is added if there's no extension)")
                .short('o')
                .long("output")
                .env("BENCHPLOT_OUTPUT")
                .num_args(1)
                .value_name("OUTPUT")
                .default_value("output")
                .value_parser(value_parser!(Utf8PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("benchmark_type")
                .help("type of benchmark to plot")
                .short('t')
                .long("benchmark_type")
                .env("BENCHPLOT_BENCHMARK_TYPE")
                .num_args(1)
                .default_value(BenchmarkKind::Simple.as_str())
                .value_parser(value_parser!(BenchmarkKind)),
        )
        .next_help_heading("Plot options")
        .arg(
            Arg::new("x_label")
                .help("label for the X axis")
                .long("x_label")
                .env("BENCHPLOT_X_LABEL")
                .num_args(1)
                .default_value("Data Size"),
        )
        .arg(
            Arg::new("title")
                .help("title of the plot")
                .long("title")
                .env("BENCHPLOT_TITLE")
                .num_args(1)
                .default_value(DEFAULT_TITLE),
        )
        .arg(
            Arg::new("series")
                .help("series names to be shown on the plot (default: all)")
                .short('s')
                .long("series")
                .env("BENCHPLOT_SERIES")
                .value_name("NAME")
                .action(ArgAction::Append)
                .value_delimiter(','),
        )
        .arg(
            Arg::new("export")
                .help("also write the plotted series as JSON to <FILE>")
                .short('e')
                .long("export")
                .num_args(1)
                .value_name("FILE")
                .value_parser(value_parser!(Utf8PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .next_help_heading("Output")
        .arg(verbose())
        .arg(quiet())
        .subcommand(
            Command::new("completion")
                .about("Generate benchplot shell completions.")
                .arg(
                    Arg::new("generator")
                        .help("shell to generate completions for")
                        .long("generate")
                        .value_parser(value_parser!(clap_complete::Shell)),
                )
                .hide(true),
        )
        .subcommand(
            Command::new("manpages")
                .about("Generate benchplot manpages.")
                .arg(
                    Arg::new("outdir")
                        .help("directory in which to create manpage files")
                        .value_parser(value_parser!(Utf8PathBuf))
                        .value_hint(ValueHint::DirPath)
                        .required(true),
                )
                .hide(true),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clap() {
        clap().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let matches = clap().try_get_matches_from(["benchplot", "in.json"]).unwrap();

        assert_eq!(
            matches.get_one::<Utf8PathBuf>("file"),
            Some(&Utf8PathBuf::from("in.json"))
        );
        assert_eq!(
            matches.get_one::<Utf8PathBuf>("output"),
            Some(&Utf8PathBuf::from("output"))
        );
        assert_eq!(
            matches.get_one::<BenchmarkKind>("benchmark_type"),
            Some(&BenchmarkKind::Simple)
        );
        assert_eq!(
            matches.get_one::<String>("x_label").map(String::as_str),
            Some("Data Size")
        );
        assert_eq!(
            matches.get_one::<String>("title").map(String::as_str),
            Some(DEFAULT_TITLE)
        );
        assert!(matches.get_many::<String>("series").is_none());
    }

    #[test]
    fn test_benchmark_type() {
        let matches = clap()
            .try_get_matches_from(["benchplot", "-t", "central_tendency", "in.json"])
            .unwrap();
        assert_eq!(
            matches.get_one::<BenchmarkKind>("benchmark_type"),
            Some(&BenchmarkKind::CentralTendency)
        );

        assert!(clap()
            .try_get_matches_from(["benchplot", "-t", "median", "in.json"])
            .is_err());
    }

    #[test]
    fn test_series_list() {
        let matches = clap()
            .try_get_matches_from(["benchplot", "-s", "Foo,Bar", "--series", "Baz", "in.json"])
            .unwrap();
        let series: Vec<&String> = matches.get_many::<String>("series").unwrap().collect();
        assert_eq!(series, vec!["Foo", "Bar", "Baz"]);
    }

    #[test]
    fn test_file_required() {
        assert!(clap().try_get_matches_from(["benchplot"]).is_err());
    }

    #[test]
    fn test_completion_without_file() {
        let matches = clap()
            .try_get_matches_from(["benchplot", "completion", "--generate", "bash"])
            .unwrap();
        assert!(matches!(matches.subcommand(), Some(("completion", _))));
    }
}
