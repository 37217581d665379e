#[macro_use]
extern crate serde_derive;

#[macro_use]
extern crate derive_builder;

use anyhow::{Context as _, Error, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::ArgMatches;
use indexmap::IndexSet;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod cli;
mod data;
mod export;
mod group;
mod model;
mod plot;

use data::{BenchmarkKind, Benchmarks};
use export::SeriesExport;
use group::Selector;
use model::Series;
use plot::PlotOptionsBuilder;

fn main() {
    if let Err(e) = try_main() {
        eprintln!("benchplot: error: {e:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let matches = cli::clap().get_matches();

    match matches.subcommand() {
        Some(("completion", matches)) => {
            if let Some(generator) = matches
                .get_one::<clap_complete::Shell>("generator")
                .copied()
            {
                let mut cmd = cli::clap();
                eprintln!("Generating completion file for {}...", generator);
                clap_complete::generate(
                    generator,
                    &mut cmd,
                    "benchplot".to_string(),
                    &mut std::io::stdout(),
                );
            }
            return Ok(());
        }
        Some(("manpages", matches)) => {
            let mut outpath: Utf8PathBuf =
                matches.get_one::<Utf8PathBuf>("outdir").unwrap().clone();
            outpath.push("benchplot.1");
            create_manpage(cli::clap(), &outpath)?;
            return Ok(());
        }
        _ => (),
    }

    let job = PlotJob::from_matches(&matches);
    job.run()?;

    Ok(())
}

fn create_manpage(cmd: clap::Command, outfile: &Utf8Path) -> Result<(), Error> {
    let man = clap_mangen::Man::new(cmd);
    let mut buffer: Vec<u8> = Default::default();
    man.render(&mut buffer)?;

    std::fs::write(outfile, buffer).with_context(|| format!("creating {outfile}"))?;
    Ok(())
}

/// Everything one invocation needs, collected from the command line.
#[derive(Debug)]
struct PlotJob {
    input: Utf8PathBuf,
    output: Utf8PathBuf,
    kind: BenchmarkKind,
    x_label: String,
    title: String,
    selector: Selector,
    export: Option<Utf8PathBuf>,
    verbose: u8,
    quiet: bool,
}

impl PlotJob {
    fn from_matches(matches: &ArgMatches) -> Self {
        let selector = match matches.get_many::<String>("series") {
            Some(values) => Selector::Some(values.cloned().collect::<IndexSet<String>>()),
            None => Selector::All,
        };

        Self {
            input: matches.get_one::<Utf8PathBuf>("file").unwrap().clone(),
            output: matches.get_one::<Utf8PathBuf>("output").unwrap().clone(),
            kind: *matches.get_one::<BenchmarkKind>("benchmark_type").unwrap(),
            x_label: matches.get_one::<String>("x_label").unwrap().clone(),
            title: matches.get_one::<String>("title").unwrap().clone(),
            selector,
            export: matches.get_one::<Utf8PathBuf>("export").cloned(),
            verbose: matches.get_count("verbose"),
            quiet: matches.get_flag("quiet"),
        }
    }

    /// Loads, groups and filters; everything up to drawing.
    fn collect(&self) -> Result<(Benchmarks, Vec<Series>)> {
        let benchmarks = data::load(&self.input, self.kind)?;

        if !self.quiet {
            println!(
                "benchplot: loaded {} {} records from {}",
                benchmarks.records.len(),
                self.kind,
                self.input
            );
        }

        let series = group::group(&benchmarks.records)
            .with_context(|| format!("grouping records of \"{}\"", self.input))?;
        let series = self.selector.apply(series);

        if series.is_empty() {
            return Err(data::LoadError::EmptyInput {
                path: self.input.clone(),
            })
            .with_context(|| format!("selecting {}", self.selector));
        }

        Ok((benchmarks, series))
    }

    fn run(&self) -> Result<Utf8PathBuf> {
        let (benchmarks, series) = self.collect()?;
        let time_unit = benchmarks.time_unit.as_deref();

        if self.verbose > 0 {
            for line in &series {
                println!(
                    "benchplot: series \"{}\": {} points ({})",
                    line.name(),
                    line.len(),
                    line.data_sizes().join(", ")
                );
            }
        }

        let options = PlotOptionsBuilder::default()
            .title(self.kind.resolve_title(&self.title))
            .x_label(self.x_label.as_str())
            .time_unit(benchmarks.time_unit.clone())
            .output(self.output.clone())
            .build()?;

        let written = plot::render(&series, &options)
            .with_context(|| format!("plotting \"{}\"", self.input))?;

        if !self.quiet {
            println!(
                "benchplot: plotted {} lines ({}) into {written}",
                series.len(),
                self.selector,
            );
        }

        if let Some(export) = &self.export {
            SeriesExport::new(time_unit, &series).write(export)?;
            if !self.quiet {
                println!("benchplot: exported series to {export}");
            }
        }

        Ok(written)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const THREE_RECORDS: &str = r#"{"benchmarks":[
        {"name":"A","data_size":"1","real_time":10},
        {"name":"A","data_size":"2","real_time":20},
        {"name":"B","data_size":"1","real_time":5}]}"#;

    fn job_for(dir: &tempfile::TempDir, content: &str, extra_args: &[&str]) -> PlotJob {
        let input = Utf8PathBuf::try_from(dir.path().join("bench.json")).unwrap();
        std::fs::write(&input, content).unwrap();

        let mut args = vec!["benchplot", "-q"];
        args.extend_from_slice(extra_args);
        args.push(input.as_str());

        let matches = cli::clap().try_get_matches_from(args).unwrap();
        PlotJob::from_matches(&matches)
    }

    #[test]
    fn test_collect_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_for(&dir, THREE_RECORDS, &[]);
        let (_, series) = job.collect().unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name(), "A");
        assert_eq!(
            series[0].points().collect::<Vec<_>>(),
            vec![("1", 10.0), ("2", 20.0)]
        );
        assert_eq!(series[1].name(), "B");
        assert_eq!(series[1].points().collect::<Vec<_>>(), vec![("1", 5.0)]);
    }

    #[test]
    fn test_collect_selected_series() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_for(&dir, THREE_RECORDS, &["--series", "B"]);
        let (_, series) = job.collect().unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name(), "B");
    }

    #[test]
    fn test_collect_nothing_selected() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_for(&dir, THREE_RECORDS, &["--series", "C"]);
        let err = job.collect().unwrap_err();

        assert!(matches!(
            err.downcast_ref::<data::LoadError>(),
            Some(data::LoadError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_collect_empty_benchmarks() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_for(&dir, r#"{"benchmarks": []}"#, &[]);
        let err = job.collect().unwrap_err();

        assert!(matches!(
            err.downcast_ref::<data::LoadError>(),
            Some(data::LoadError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_collect_central_tendency() {
        let dir = tempfile::tempdir().unwrap();
        let job = job_for(
            &dir,
            r#"{"benchmarks":[
                {"name":"BM_Foo/128_mean","real_time":10,"time_unit":"us"},
                {"name":"BM_Foo/256_mean","real_time":21,"time_unit":"us"},
                {"name":"BM_Bar/128_mean","real_time":7,"time_unit":"us"}]}"#,
            &["-t", "central_tendency"],
        );
        let (benchmarks, series) = job.collect().unwrap();

        assert_eq!(benchmarks.time_unit.as_deref(), Some("us"));
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name(), "Foo");
        assert_eq!(series[0].data_sizes(), &["128".to_string(), "256".to_string()]);
        assert_eq!(series[1].name(), "Bar");
    }

    #[test]
    fn test_run_rejects_unsupported_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("plot.svg");
        let job = job_for(&dir, THREE_RECORDS, &["-o", output.to_str().unwrap()]);
        let err = job.run().unwrap_err();

        assert!(err.downcast_ref::<plot::PlotError>().is_some());
    }

    #[test]
    fn test_run_writes_plot_and_export() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("plot");
        let export = dir.path().join("series.json");
        let job = job_for(
            &dir,
            THREE_RECORDS,
            &[
                "-o",
                output.to_str().unwrap(),
                "-e",
                export.to_str().unwrap(),
            ],
        );

        let written = job.run().unwrap();
        assert_eq!(written.extension(), Some("png"));
        assert!(written.exists());
        assert!(export.exists());
    }
}
